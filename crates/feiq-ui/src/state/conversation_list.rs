//! Conversation list rows (messaging sidebar)

use chrono::{DateTime, Utc};
use feiq_core::{format_relative_time, Conversation, ConversationPeer, UserStatus};
use unicode_segmentation::UnicodeSegmentation;

/// Preview length in grapheme clusters
pub const PREVIEW_GRAPHEMES: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationListRow {
    pub id: String,
    pub name: String,
    pub preview: String,
    pub time_label: String,
    /// "3", "99+" or nothing
    pub unread_badge: Option<String>,
    pub pinned: bool,
    pub is_group: bool,
    /// Presence dot for single chats
    pub status: Option<UserStatus>,
    pub is_active: bool,
}

/// Cut `text` to `max` grapheme clusters, appending an ellipsis when cut
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

fn unread_badge(count: u32) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}

pub fn conversation_row(
    conv: &Conversation,
    active_id: Option<&str>,
    now: DateTime<Utc>,
) -> ConversationListRow {
    let last = &conv.last_message;
    let (is_group, status) = match &conv.peer {
        ConversationPeer::Single(user) => (false, user.status),
        ConversationPeer::Group(_) => (true, None),
    };
    let preview = if is_group {
        format!("{}: {}", last.sender_name, last.content)
    } else {
        last.content.clone()
    };

    ConversationListRow {
        id: conv.id.clone(),
        name: conv.display_name().to_string(),
        preview: truncate_graphemes(&preview, PREVIEW_GRAPHEMES),
        time_label: format_relative_time(last.timestamp, now),
        unread_badge: unread_badge(conv.unread_count),
        pinned: conv.pinned,
        is_group,
        status,
        is_active: active_id == Some(conv.id.as_str()),
    }
}
