//! Core type definitions for FeiQ
//!
//! This module contains all shared data shapes: users, conversations and
//! messages, file transfers, the organization directory and screenshots.

mod directory_types;
mod message_types;
mod screenshot_types;
mod transfer_types;

pub use directory_types::*;
pub use message_types::*;
pub use screenshot_types::*;
pub use transfer_types::*;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Display name used when a referenced user cannot be resolved
pub const UNKNOWN_USER_NAME: &str = "未知用户";

/// Online presence of a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Away,
    Busy,
    #[default]
    Offline,
}

impl UserStatus {
    pub fn badge(&self) -> Badge {
        match self {
            Self::Online => Badge::new("在线", "status-online"),
            Self::Away => Badge::new("离开", "status-away"),
            Self::Busy => Badge::new("忙碌", "status-busy"),
            Self::Offline => Badge::new("离线", "status-offline"),
        }
    }
}

/// Label plus style class for a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub style_class: &'static str,
}

impl Badge {
    pub const fn new(label: &'static str, style_class: &'static str) -> Self {
        Self { label, style_class }
    }
}

/// User as seen by messaging and file transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub department: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: String::new(),
            status: None,
            department: None,
        }
    }

    /// Placeholder shown for ids that are not in the user map
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::new(id, UNKNOWN_USER_NAME)
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Lookup table of users keyed by id
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Resolve a user for display, falling back to a placeholder
    pub fn display_user(&self, id: &str) -> Cow<'_, User> {
        match self.users.get(id) {
            Some(user) => Cow::Borrowed(user),
            None => {
                tracing::debug!("Unknown user id {}, using placeholder", id);
                Cow::Owned(User::placeholder(id))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_user_placeholder() {
        let directory = UserDirectory::new(vec![User::new("user-1", "张三")]);

        assert_eq!(directory.display_user("user-1").name, "张三");

        let missing = directory.display_user("user-404");
        assert_eq!(missing.id, "user-404");
        assert_eq!(missing.name, UNKNOWN_USER_NAME);
        assert_eq!(directory.len(), 1);
        assert!(!directory.is_empty());
        assert!(UserDirectory::default().is_empty());
    }

    #[test]
    fn test_user_deserialize_minimal() {
        let user: User = serde_json::from_str(r#"{"id":"u1","name":"李四"}"#).unwrap();
        assert_eq!(user.status, None);
        assert!(user.avatar.is_empty());
    }

    #[test]
    fn test_status_defaults_to_offline() {
        assert_eq!(UserStatus::default(), UserStatus::Offline);
        let user: DirectoryUser =
            serde_json::from_str(r#"{"id":"u9","name":"周九","departmentId":"dept-hr"}"#).unwrap();
        assert_eq!(user.status, UserStatus::Offline);
    }

    #[test]
    fn test_user_status_badge() {
        assert_eq!(UserStatus::Busy.badge().label, "忙碌");
        assert_eq!(UserStatus::Online.badge().style_class, "status-online");
    }
}
