//! Outbound actions
//!
//! Every user intent that would reach a host application (network layer,
//! file system, capture service) is emitted as a [`UiAction`] through an
//! [`ActionSink`]. The core never performs that work itself.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{AnnotationShape, ScreenshotType};

/// A request handed to the host application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    // File transfer
    PauseTransfer { transfer_id: String },
    ResumeTransfer { transfer_id: String },
    CancelTransfer { transfer_id: String },
    RetryTransfer { transfer_id: String },
    OpenFolder { transfer_id: String },
    Redownload { transfer_id: String },
    SendFiles { receiver_id: String, file_names: Vec<String> },

    // Messaging
    SelectConversation { conversation_id: String },
    SendText { conversation_id: String, message_id: String },
    SendImage { conversation_id: String, message_id: String },
    ReplyMessage { conversation_id: String, message_id: String, quoted_id: String },
    ReactMessage { conversation_id: String, message_id: String, emoji: String },
    RetractMessage { conversation_id: String, message_id: String },

    // Organization directory
    SelectDepartment { department_id: String },
    StartChat { user_id: String },
    ViewDetails { user_id: String },
    SearchDirectory { query: String },

    // Collaboration
    TakeScreenshot { screenshot_type: ScreenshotType },
    AddAnnotation { screenshot_id: String, shape: AnnotationShape },
    DeleteAnnotation { screenshot_id: String, annotation_id: String },
    Undo,
    Redo,
    SaveScreenshot { screenshot_id: String },
    CopyScreenshot { screenshot_id: String },
    SendToContact { screenshot_id: String, contact_id: String },
    SendToChat { screenshot_id: String, conversation_id: String },
}

/// Receiver of outbound actions
#[cfg_attr(test, mockall::automock)]
pub trait ActionSink {
    fn emit(&mut self, action: UiAction);
}

/// Sink that only logs each action
#[derive(Debug, Default)]
pub struct TracingActionSink;

impl ActionSink for TracingActionSink {
    fn emit(&mut self, action: UiAction) {
        info!(?action, "ui action");
    }
}

/// Sink that keeps every action in order
#[derive(Debug, Default)]
pub struct RecordingActionSink {
    actions: Vec<UiAction>,
}

impl RecordingActionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[UiAction] {
        &self.actions
    }

    pub fn take(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.actions)
    }
}

impl ActionSink for RecordingActionSink {
    fn emit(&mut self, action: UiAction) {
        self.actions.push(action);
    }
}
