//! Screenshot annotation
//!
//! Holds the selected screenshot, its annotation list with snapshot-based
//! undo/redo, and the active drawing tool.

mod session;

pub use session::*;
