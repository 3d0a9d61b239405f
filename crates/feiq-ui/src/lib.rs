//! FeiQ UI Library
//!
//! Application state for the FeiQ desktop client. Renderers read rows from
//! [`AppState`] and call its intent methods; every intent that needs the
//! host is emitted through the configured action sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────────┐
//! │ MainNav  │  Section view                                        │
//! │          │                                                      │
//! │ 消息     │  ConversationListRow* │ MessageRow*                  │
//! │ 文件传输 │  FileTransfer* (direction tab, history toggle)       │
//! │ 组织架构 │  DepartmentTreeRow*   │ DirectoryUser*               │
//! │ 协作工具 │  Screenshot*          │ Annotation* + Tool           │
//! │ 设置     │                                                      │
//! └──────────┴──────────────────────────────────────────────────────┘
//! ```

pub mod state;

// Re-exports
pub use state::{
    conversation_row, department_rows, transfer_row, truncate_graphemes, AppState,
    ConversationListRow, DepartmentTreeRow, MainNav, TransferListRow, PREVIEW_GRAPHEMES,
    TREE_INDENT,
};

/// Mock records bundled with the binary
pub const DEMO_DATA: &str = include_str!("../data/demo-data.json");
