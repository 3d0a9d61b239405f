//! Organization directory
//!
//! Lazy department tree over a flat department list plus the colleague
//! search that the directory view drives.

mod collation;
mod index;

pub use collation::*;
pub use index::*;
