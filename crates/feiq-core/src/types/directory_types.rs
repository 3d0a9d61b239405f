//! Organization directory types

use serde::{Deserialize, Serialize};

use super::UserStatus;

/// A department node, linked to its parent by id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    /// Cached depth, 0 for roots
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub member_count: u32,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            level: 0,
            member_count: 0,
        }
    }
}

/// A colleague listed in the organization directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    pub department_id: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl DirectoryUser {
    /// Case-insensitive substring match on name, pinyin, department or position
    pub fn matches(&self, lowercase_query: &str) -> bool {
        [&self.name, &self.pinyin, &self.department, &self.position]
            .iter()
            .any(|field| field.to_lowercase().contains(lowercase_query))
    }
}
