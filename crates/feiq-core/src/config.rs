//! Application configuration and mock data loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::collaboration::DEFAULT_UNDO_DEPTH;
use crate::error::{ConfigError, Error, Result};
use crate::types::{Conversation, Department, DirectoryUser, FileTransfer, Screenshot, User};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Viewer identity threaded through every view computation
    pub current_user_id: String,
    /// Selecting this department shows the whole company
    pub root_department_id: String,
    /// Departments expanded when the directory opens
    pub initially_expanded: Vec<String>,
    pub max_undo_depth: usize,
    /// Picks the department name collation
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            current_user_id: "user-1".to_string(),
            root_department_id: "dept-root".to_string(),
            initially_expanded: vec!["dept-root".to_string()],
            max_undo_depth: DEFAULT_UNDO_DEPTH,
            locale: "zh-CN".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/feiq/config.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("feiq").join("config.json"))
            .ok_or(Error::Config(ConfigError::NoConfigDir))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    fn validate(&self) -> Result<()> {
        if self.current_user_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currentUserId",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if self.max_undo_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxUndoDepth",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Static records that stand in for a backend feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockData {
    pub users: Vec<User>,
    pub departments: Vec<Department>,
    pub directory_users: Vec<DirectoryUser>,
    pub conversations: Vec<Conversation>,
    pub file_transfers: Vec<FileTransfer>,
    pub screenshots: Vec<Screenshot>,
}

impl MockData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "Loaded mock data from {:?}: {} conversations, {} transfers, {} screenshots",
            path,
            data.conversations.len(),
            data.file_transfers.len(),
            data.screenshots.len()
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{ "currentUserId": "user-7" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.current_user_id, "user-7");
        assert_eq!(config.root_department_id, "dept-root");
        assert_eq!(config.max_undo_depth, DEFAULT_UNDO_DEPTH);
    }

    #[test]
    fn test_missing_config_falls_back() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "maxUndoDepth": 0 }"#).unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "maxUndoDepth", .. })
        ));
    }

    #[test]
    fn test_malformed_config_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_mock_data_sections_are_optional() {
        let data = MockData::from_json(r#"{ "departments": [
            { "id": "dept-root", "name": "公司", "parentId": null, "level": 0, "memberCount": 10 }
        ] }"#)
        .unwrap();
        assert_eq!(data.departments.len(), 1);
        assert!(data.conversations.is_empty());
    }
}
