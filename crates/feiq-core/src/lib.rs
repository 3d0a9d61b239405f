//! FeiQ Core Library
//!
//! This crate provides the view-state core of the FeiQ LAN messenger:
//! - Conversation list and message thread presentation
//! - File transfer lifecycle state machine
//! - Organization directory tree and colleague search
//! - Screenshot annotation with undo/redo
//!
//! No I/O happens here beyond loading configuration and mock data. Work
//! that needs a network or a file system is emitted as a [`UiAction`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       feiq-core                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  messaging/      - Conversation store, thread rows          │
//! │  transfer/       - Transfer engine, size/speed formatting   │
//! │  directory/      - Department tree, user filter             │
//! │  collaboration/  - Annotation session, undo/redo            │
//! │  events.rs       - Outbound actions and sinks               │
//! │  config.rs       - App config, mock data                    │
//! │  types/          - Shared type definitions                  │
//! │  error.rs        - Error types                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod collaboration;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod messaging;
pub mod transfer;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use collaboration::{AnnotationSession, DEFAULT_UNDO_DEPTH};
pub use config::{AppConfig, MockData};
pub use directory::{Collation, DirectoryIndex, DirectoryStats};
pub use events::{ActionSink, RecordingActionSink, TracingActionSink, UiAction};
pub use messaging::{
    format_message_time, format_relative_time, thread_rows, ConversationStore, MessageRow,
    RETRACTED_NOTICE,
};
pub use transfer::{
    format_file_size, format_remaining, format_speed, DirectionFilter, OutgoingFile,
    TransferEngine, TransferStats,
};
