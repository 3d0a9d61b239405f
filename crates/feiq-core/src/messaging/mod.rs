//! Conversations and message threads

mod conversation;
mod thread;

pub use conversation::*;
pub use thread::*;
