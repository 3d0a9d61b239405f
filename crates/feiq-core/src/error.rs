//! Error types for FeiQ Core

use thiserror::Error;

use crate::types::{MessageStatus, TransferStatus};

/// Main error type for FeiQ operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File transfer lifecycle rejections
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Transfer not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} transfer {id} while {status:?}")]
    InvalidTransition {
        id: String,
        action: &'static str,
        status: TransferStatus,
    },

    #[error("Progress out of range: {0}")]
    ProgressOutOfRange(f64),
}

/// Conversation and message rejections
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessageError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Message {id} cannot go from {from:?} to {to:?}")]
    InvalidStatus {
        id: String,
        from: MessageStatus,
        to: MessageStatus,
    },

    #[error("Only the sender may retract message {0}")]
    NotOwnMessage(String),

    #[error("No active conversation")]
    NoActiveConversation,

    #[error("Message content is empty")]
    EmptyContent,
}

/// Organization directory errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectoryError {
    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Department {id} references missing parent {parent_id}")]
    DanglingParent { id: String, parent_id: String },

    #[error("Department hierarchy contains a cycle through {0}")]
    Cycle(String),

    #[error("Duplicate department id: {0}")]
    DuplicateDepartment(String),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Screenshot annotation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    #[error("Screenshot not found: {0}")]
    ScreenshotNotFound(String),

    #[error("No screenshot selected")]
    NoScreenshotSelected,

    #[error("Annotation not found: {0}")]
    AnnotationNotFound(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_wraps_into_error() {
        let err: Error = TransferError::NotFound("t9".to_string()).into();
        assert_eq!(err.to_string(), "Transfer error: Transfer not found: t9");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = TransferError::InvalidTransition {
            id: "t1".to_string(),
            action: "pause",
            status: TransferStatus::Completed,
        };
        assert_eq!(err.to_string(), "Cannot pause transfer t1 while Completed");
    }

    #[test]
    fn test_error_serializes_as_string() {
        let err: Error = DirectoryError::Cycle("dept-a".to_string()).into();
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Directory error: Department hierarchy contains a cycle through dept-a\"");
    }
}
