//! Conversation and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Badge, User};

/// Kind of message content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Emoji,
    Image,
    File,
    System,
}

/// Delivery status of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Read,
    Unread,
    Failed,
}

impl MessageStatus {
    /// Whether a message may move from `self` to `next`
    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        matches!(
            (self, next),
            (Self::Sending, Self::Sent)
                | (Self::Sending, Self::Failed)
                | (Self::Sent, Self::Read)
                | (Self::Unread, Self::Read)
                | (Self::Failed, Self::Sending)
        )
    }

    pub fn badge(&self) -> Badge {
        match self {
            Self::Sending => Badge::new("发送中", "message-sending"),
            Self::Sent => Badge::new("已发送", "message-sent"),
            Self::Read => Badge::new("已读", "message-read"),
            Self::Unread => Badge::new("未读", "message-unread"),
            Self::Failed => Badge::new("发送失败", "message-failed"),
        }
    }
}

/// A user who reacted with a given emoji
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionUser {
    pub id: String,
    pub name: String,
}

/// All users who reacted to a message with one emoji
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageReaction {
    pub emoji: String,
    pub users: Vec<ReactionUser>,
}

/// Snapshot of a quoted message taken at reply time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuote {
    pub message_id: String,
    pub content: String,
    pub sender_name: String,
}

impl MessageQuote {
    /// Capture the quoted message as it is right now
    pub fn of(message: &Message) -> Self {
        Self {
            message_id: message.id.clone(),
            content: message.content.clone(),
            sender_name: message.sender_name.clone(),
        }
    }
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub sender_id: String,
    pub sender_name: String,
    pub status: MessageStatus,
    #[serde(default)]
    pub reactions: Vec<MessageReaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<MessageQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Message {
    /// Outgoing message in the `sending` state
    pub fn outgoing(sender: &User, message_type: MessageType, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type,
            content: content.into(),
            timestamp: Utc::now(),
            sender_id: sender.id.clone(),
            sender_name: sender.name.clone(),
            status: MessageStatus::Sending,
            reactions: Vec::new(),
            quote: None,
            image_thumbnail_url: None,
            image_url: None,
            file_url: None,
            file_name: None,
            file_size: None,
        }
    }

    /// Add `user` under `emoji`; returns false if already present
    pub fn add_reaction(&mut self, emoji: &str, user: ReactionUser) -> bool {
        match self.reactions.iter_mut().find(|r| r.emoji == emoji) {
            Some(reaction) => {
                if reaction.users.iter().any(|u| u.id == user.id) {
                    return false;
                }
                reaction.users.push(user);
                true
            }
            None => {
                self.reactions.push(MessageReaction {
                    emoji: emoji.to_string(),
                    users: vec![user],
                });
                true
            }
        }
    }

    /// Remove `user_id` from `emoji`, dropping the group once empty
    pub fn remove_reaction(&mut self, emoji: &str, user_id: &str) -> bool {
        let Some(reaction) = self.reactions.iter_mut().find(|r| r.emoji == emoji) else {
            return false;
        };
        let before = reaction.users.len();
        reaction.users.retain(|u| u.id != user_id);
        let removed = reaction.users.len() != before;
        self.reactions.retain(|r| !r.users.is_empty());
        removed
    }

    pub fn summary(&self) -> LastMessage {
        LastMessage {
            id: self.id.clone(),
            content: self.content.clone(),
            message_type: self.message_type,
            timestamp: self.timestamp,
            sender_id: self.sender_id.clone(),
            sender_name: self.sender_name.clone(),
        }
    }
}

/// Denormalized summary of the newest message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub sender_id: String,
    pub sender_name: String,
}

/// A chat group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub member_count: u32,
    #[serde(default)]
    pub members: Vec<User>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    Single,
    Group,
}

/// The other side of a conversation
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationPeer {
    Single(User),
    Group(Group),
}

/// A conversation in the sidebar list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawConversation", into = "RawConversation")]
pub struct Conversation {
    pub id: String,
    pub pinned: bool,
    pub unread_count: u32,
    pub last_message: LastMessage,
    pub peer: ConversationPeer,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn conversation_type(&self) -> ConversationType {
        match self.peer {
            ConversationPeer::Single(_) => ConversationType::Single,
            ConversationPeer::Group(_) => ConversationType::Group,
        }
    }

    /// Participant name for single chats, group name for groups
    pub fn display_name(&self) -> &str {
        match &self.peer {
            ConversationPeer::Single(user) => &user.name,
            ConversationPeer::Group(group) => &group.name,
        }
    }

    pub fn find_message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn find_message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

/// Wire shape with `type` plus optional participant/group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConversation {
    id: String,
    #[serde(rename = "type")]
    conversation_type: ConversationType,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    unread_count: u32,
    last_message: LastMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    participant: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<Message>>,
}

impl TryFrom<RawConversation> for Conversation {
    type Error = String;

    fn try_from(raw: RawConversation) -> std::result::Result<Self, Self::Error> {
        let peer = match (raw.conversation_type, raw.participant, raw.group) {
            (ConversationType::Single, Some(user), None) => ConversationPeer::Single(user),
            (ConversationType::Group, None, Some(group)) => ConversationPeer::Group(group),
            (kind, participant, group) => {
                return Err(format!(
                    "conversation {} of type {:?} has participant={} group={}",
                    raw.id,
                    kind,
                    participant.is_some(),
                    group.is_some()
                ))
            }
        };

        Ok(Self {
            id: raw.id,
            pinned: raw.pinned,
            unread_count: raw.unread_count,
            last_message: raw.last_message,
            peer,
            messages: raw.messages.unwrap_or_default(),
        })
    }
}

impl From<Conversation> for RawConversation {
    fn from(conv: Conversation) -> Self {
        let conversation_type = conv.conversation_type();
        let (participant, group) = match conv.peer {
            ConversationPeer::Single(user) => (Some(user), None),
            ConversationPeer::Group(group) => (None, Some(group)),
        };
        Self {
            id: conv.id,
            conversation_type,
            pinned: conv.pinned,
            unread_count: conv.unread_count,
            last_message: conv.last_message,
            participant,
            group,
            messages: Some(conv.messages),
        }
    }
}
