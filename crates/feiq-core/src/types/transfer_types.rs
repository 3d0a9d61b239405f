//! File transfer types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Badge;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Send,
    Receive,
}

/// Transfer lifecycle state machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Queued, no bytes moved yet
    Waiting,
    /// Bytes are flowing
    Transferring,
    /// Stopped by the user, resumable
    Paused,
    /// All bytes delivered
    Completed,
    /// Stopped by the user, final
    Cancelled,
    /// Stopped by an error, retryable
    Failed,
}

impl TransferStatus {
    /// Waiting, transferring or paused
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Transferring | Self::Paused)
    }

    /// Completed, cancelled or failed
    pub fn is_history(&self) -> bool {
        !self.is_active()
    }

    pub fn badge(&self) -> Badge {
        match self {
            Self::Waiting => Badge::new("等待中", "badge-slate"),
            Self::Transferring => Badge::new("传输中", "badge-emerald"),
            Self::Paused => Badge::new("已暂停", "badge-amber"),
            Self::Completed => Badge::new("已完成", "badge-blue"),
            Self::Cancelled => Badge::new("已取消", "badge-slate-muted"),
            Self::Failed => Badge::new("失败", "badge-red"),
        }
    }
}

/// Broad file category used to pick an icon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Other,
}

impl FileKind {
    /// Classify a file by its name
    pub fn from_file_name(name: &str) -> Self {
        let mime = mime_guess::from_path(name).first_or_octet_stream();
        match (mime.type_().as_str(), mime.subtype().as_str()) {
            ("image", _) => Self::Image,
            ("video", _) => Self::Video,
            ("audio", _) => Self::Audio,
            ("text", _) | ("application", "pdf") => Self::Document,
            ("application", sub)
                if sub.contains("word")
                    || sub.contains("excel")
                    || sub.contains("powerpoint")
                    || sub.contains("officedocument") =>
            {
                Self::Document
            }
            ("application", sub)
                if sub.contains("zip")
                    || sub.contains("tar")
                    || sub.contains("rar")
                    || sub.contains("7z")
                    || sub.contains("gzip") =>
            {
                Self::Archive
            }
            _ => Self::Other,
        }
    }
}

/// A single file transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileTransfer {
    pub id: String,
    pub direction: TransferDirection,
    pub sender_id: String,
    pub receiver_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub status: TransferStatus,
    /// Percent in [0, 100]
    pub progress: f64,
    /// Bytes per second
    pub transfer_speed: u64,
    /// Minutes
    pub remaining_time: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FileTransfer {
    pub fn file_kind(&self) -> FileKind {
        FileKind::from_file_name(&self.file_name)
    }

    /// Whether progress and speed should be displayed
    pub fn shows_telemetry(&self) -> bool {
        self.status.is_active()
    }
}

/// Lowercase extension of a file name, empty when there is none
pub fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
