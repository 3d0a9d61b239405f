//! Per-message presentation for a thread

use chrono::{DateTime, Datelike, Utc};

use crate::types::{Message, MessageType};

/// Presentation flags for one message in a thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageRow<'a> {
    pub message: &'a Message,
    /// Sent by the viewer, aligned right
    pub is_sent: bool,
    /// First message of a run from the same other sender
    pub show_avatar: bool,
    /// Sender name printed above the bubble
    pub show_sender_name: bool,
    pub can_retract: bool,
}

/// Compute rows for `messages` as seen by `viewer_id`
pub fn thread_rows<'a>(messages: &'a [Message], viewer_id: &str) -> Vec<MessageRow<'a>> {
    let mut previous_sender: Option<&str> = None;

    messages
        .iter()
        .map(|message| {
            let is_sent = message.sender_id == viewer_id;
            let starts_run = previous_sender != Some(message.sender_id.as_str());
            previous_sender = Some(message.sender_id.as_str());

            let show_avatar = !is_sent && starts_run;
            MessageRow {
                message,
                is_sent,
                show_avatar,
                show_sender_name: show_avatar,
                can_retract: is_sent && message.message_type != MessageType::System,
            }
        })
        .collect()
}

/// Relative time for the conversation list
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - timestamp;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "刚刚".to_string()
    } else if minutes < 60 {
        format!("{}分钟前", minutes)
    } else if hours < 24 {
        format!("{}小时前", hours)
    } else if days < 7 {
        format!("{}天前", days)
    } else {
        format!("{}/{}", timestamp.month(), timestamp.day())
    }
}

/// "HH:MM" shown under a bubble
pub fn format_message_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}
