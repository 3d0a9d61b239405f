//! File transfer lifecycle
//!
//! This module provides:
//! - The per-transfer state machine and its telemetry updates
//! - Active/history partitions and direction filtering
//! - Size and speed formatting for the transfer list

mod engine;
mod format;

pub use engine::*;
pub use format::*;
