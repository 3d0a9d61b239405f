//! Conversation list and message lifecycle

use tracing::{debug, info, warn};

use crate::error::MessageError;
use crate::types::{
    Conversation, Message, MessageQuote, MessageStatus, MessageType, ReactionUser, User,
};

type MessageResult<T> = std::result::Result<T, MessageError>;

/// Content that replaces a retracted message
pub const RETRACTED_NOTICE: &str = "你撤回了一条消息";

/// Holds the conversation list, the active conversation and the search query
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    search_query: String,
}

impl ConversationStore {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            active_id: None,
            search_query: String::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> MessageResult<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| MessageError::ConversationNotFound(id.to_string()))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// Make `id` the active conversation and mark it read
    pub fn select(&mut self, id: &str) -> MessageResult<&Conversation> {
        let conv = self.get_mut(id)?;
        conv.unread_count = 0;
        for message in conv.messages.iter_mut() {
            if message.status == MessageStatus::Unread {
                message.status = MessageStatus::Read;
            }
        }
        info!("Selected conversation {}", id);
        self.active_id = Some(id.to_string());
        self.get_mut(id).map(|c| &*c)
    }

    pub fn pinned(&self) -> Vec<&Conversation> {
        self.conversations.iter().filter(|c| c.pinned).collect()
    }

    pub fn regular(&self) -> Vec<&Conversation> {
        self.conversations.iter().filter(|c| !c.pinned).collect()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    fn matches_search(&self, conv: &Conversation) -> bool {
        let query = self.search_query.trim();
        if query.is_empty() {
            return true;
        }
        conv.display_name()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    pub fn filtered_pinned(&self) -> Vec<&Conversation> {
        self.pinned()
            .into_iter()
            .filter(|c| self.matches_search(c))
            .collect()
    }

    pub fn filtered_regular(&self) -> Vec<&Conversation> {
        self.regular()
            .into_iter()
            .filter(|c| self.matches_search(c))
            .collect()
    }

    pub fn filtered_all(&self) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|c| self.matches_search(c))
            .collect()
    }

    /// Flip the pinned flag, returning the new value
    pub fn toggle_pin(&mut self, id: &str) -> MessageResult<bool> {
        let conv = self.get_mut(id)?;
        conv.pinned = !conv.pinned;
        Ok(conv.pinned)
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    /// Append an outgoing message, optionally quoting `quote_id`
    pub fn send_text(
        &mut self,
        conversation_id: &str,
        sender: &User,
        content: &str,
        quote_id: Option<&str>,
    ) -> MessageResult<&Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(MessageError::EmptyContent);
        }

        let conv = self.get_mut(conversation_id)?;
        let quote = match quote_id {
            Some(qid) => Some(
                conv.find_message(qid)
                    .map(MessageQuote::of)
                    .ok_or_else(|| MessageError::MessageNotFound(qid.to_string()))?,
            ),
            None => None,
        };

        let mut message = Message::outgoing(sender, MessageType::Text, content);
        message.quote = quote;
        Ok(push_message(conv, message))
    }

    pub fn send_image(
        &mut self,
        conversation_id: &str,
        sender: &User,
        image_url: &str,
        thumbnail_url: &str,
    ) -> MessageResult<&Message> {
        let conv = self.get_mut(conversation_id)?;
        let mut message = Message::outgoing(sender, MessageType::Image, "[图片]");
        message.image_url = Some(image_url.to_string());
        message.image_thumbnail_url = Some(thumbnail_url.to_string());
        Ok(push_message(conv, message))
    }

    /// Deliver an incoming message
    ///
    /// Counts as unread unless the conversation is the active one.
    pub fn receive(&mut self, conversation_id: &str, mut message: Message) -> MessageResult<&Message> {
        let is_active = self.active_id.as_deref() == Some(conversation_id);
        let conv = self.get_mut(conversation_id)?;

        if is_active {
            message.status = MessageStatus::Read;
        } else {
            message.status = MessageStatus::Unread;
            conv.unread_count += 1;
        }
        debug!("Received {} in {}", message.id, conversation_id);
        Ok(push_message(conv, message))
    }

    /// Move a message along its delivery lifecycle
    pub fn set_message_status(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        status: MessageStatus,
    ) -> MessageResult<&Message> {
        let message = self.message_mut(conversation_id, message_id)?;
        if !message.status.can_transition_to(status) {
            warn!(
                "Rejected status change of {}: {:?} -> {:?}",
                message_id, message.status, status
            );
            return Err(MessageError::InvalidStatus {
                id: message_id.to_string(),
                from: message.status,
                to: status,
            });
        }
        message.status = status;
        Ok(&*message)
    }

    /// Add a reaction; returns false when the user already reacted with `emoji`
    pub fn react(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        emoji: &str,
        user: &User,
    ) -> MessageResult<bool> {
        let message = self.message_mut(conversation_id, message_id)?;
        Ok(message.add_reaction(
            emoji,
            ReactionUser {
                id: user.id.clone(),
                name: user.name.clone(),
            },
        ))
    }

    pub fn unreact(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> MessageResult<bool> {
        let message = self.message_mut(conversation_id, message_id)?;
        Ok(message.remove_reaction(emoji, user_id))
    }

    /// Replace one of the viewer's own messages with a retraction notice
    ///
    /// Quotes already taken from it keep their snapshot.
    pub fn retract(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        viewer_id: &str,
    ) -> MessageResult<&Message> {
        let conv = self.get_mut(conversation_id)?;
        let message = conv
            .find_message_mut(message_id)
            .ok_or_else(|| MessageError::MessageNotFound(message_id.to_string()))?;

        if message.sender_id != viewer_id || message.message_type == MessageType::System {
            return Err(MessageError::NotOwnMessage(message_id.to_string()));
        }

        message.message_type = MessageType::System;
        message.content = RETRACTED_NOTICE.to_string();
        message.reactions.clear();
        message.quote = None;
        message.image_url = None;
        message.image_thumbnail_url = None;
        message.file_url = None;
        message.file_name = None;
        message.file_size = None;

        let summary = message.summary();
        if conv.last_message.id == message_id {
            conv.last_message = summary;
        }
        info!("Retracted message {} in {}", message_id, conversation_id);
        conv.find_message(message_id)
            .ok_or_else(|| MessageError::MessageNotFound(message_id.to_string()))
    }

    fn message_mut(&mut self, conversation_id: &str, message_id: &str) -> MessageResult<&mut Message> {
        self.get_mut(conversation_id)?
            .find_message_mut(message_id)
            .ok_or_else(|| MessageError::MessageNotFound(message_id.to_string()))
    }
}

fn push_message(conv: &mut Conversation, message: Message) -> &Message {
    conv.last_message = message.summary();
    conv.messages.push(message);
    &conv.messages[conv.messages.len() - 1]
}
