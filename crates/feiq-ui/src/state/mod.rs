//! Application state management
//!
//! Centralized state for the FeiQ front-end.

mod app_state;
mod conversation_list;
mod department_tree;
mod transfer_list;

pub use app_state::*;
pub use conversation_list::*;
pub use department_tree::*;
pub use transfer_list::*;
