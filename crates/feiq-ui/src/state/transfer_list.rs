//! File transfer list rows

use feiq_core::{
    format_file_size, format_remaining, format_speed, Badge, FileKind, FileTransfer,
    TransferDirection, UserDirectory,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TransferListRow {
    pub id: String,
    pub file_name: String,
    pub kind: FileKind,
    pub size_label: String,
    /// Name of the other party
    pub peer_name: String,
    pub direction: TransferDirection,
    pub badge: Badge,
    /// Percent, drawn as a bar only while telemetry is shown
    pub progress: f64,
    /// Speed and remaining time, only for active transfers
    pub telemetry: Option<(String, String)>,
    pub error_message: Option<String>,
}

pub fn transfer_row(transfer: &FileTransfer, users: &UserDirectory) -> TransferListRow {
    let peer_id = match transfer.direction {
        TransferDirection::Send => &transfer.receiver_id,
        TransferDirection::Receive => &transfer.sender_id,
    };
    let telemetry = transfer.shows_telemetry().then(|| {
        (
            format_speed(transfer.transfer_speed),
            format_remaining(transfer.remaining_time),
        )
    });

    TransferListRow {
        id: transfer.id.clone(),
        file_name: transfer.file_name.clone(),
        kind: transfer.file_kind(),
        size_label: format_file_size(transfer.file_size),
        peer_name: users.display_user(peer_id).name.clone(),
        direction: transfer.direction,
        badge: transfer.status.badge(),
        progress: transfer.progress,
        telemetry,
        error_message: transfer.error_message.clone(),
    }
}
