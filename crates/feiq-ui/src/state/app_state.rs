//! Main application state

use chrono::Utc;
use feiq_core::error::{MessageError, TransferError};
use feiq_core::{
    thread_rows, ActionSink, AnnotationSession, AnnotationShape, AppConfig, Collation,
    Conversation, ConversationStore, DirectionFilter, DirectoryIndex, FileTransfer, MessageRow,
    MockData, OutgoingFile, Result, Screenshot, ScreenshotType, Tool, TransferEngine, UiAction,
    User, UserDirectory,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    conversation_row, department_rows, transfer_row, ConversationListRow, DepartmentTreeRow,
    TransferListRow,
};

/// Sections of the main navigation rail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MainNav {
    #[default]
    Messaging,
    FileTransfer,
    Organization,
    Collaboration,
    Settings,
}

impl MainNav {
    pub const ALL: [MainNav; 5] = [
        Self::Messaging,
        Self::FileTransfer,
        Self::Organization,
        Self::Collaboration,
        Self::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Messaging => "消息",
            Self::FileTransfer => "文件传输",
            Self::Organization => "组织架构",
            Self::Collaboration => "协作工具",
            Self::Settings => "设置",
        }
    }
}

/// Main application state
pub struct AppState {
    // === Configuration ===
    pub config: AppConfig,
    /// Viewer identity
    pub current_user: User,
    /// Users referenced by messages and transfers
    pub users: UserDirectory,

    // === Navigation ===
    pub active_section: MainNav,

    // === Sections ===
    pub conversations: ConversationStore,
    pub transfers: TransferEngine,
    pub transfer_filter: DirectionFilter,
    pub show_transfer_history: bool,
    pub directory: DirectoryIndex,
    pub annotations: AnnotationSession,

    // === UI State ===
    /// Error message to display
    pub error_message: Option<String>,

    sink: Box<dyn ActionSink>,
}

impl AppState {
    /// Build state from configuration and static records
    pub fn new(config: AppConfig, data: MockData, sink: Box<dyn ActionSink>) -> Result<Self> {
        let users = UserDirectory::new(data.users);
        let current_user = users.display_user(&config.current_user_id).into_owned();

        let mut directory = DirectoryIndex::new(
            data.departments,
            data.directory_users,
            config.root_department_id.clone(),
        )?
        .with_collation(Collation::for_locale(&config.locale));
        directory.expand_all(config.initially_expanded.iter().map(String::as_str));

        Ok(Self {
            current_user,
            users,
            active_section: MainNav::default(),
            conversations: ConversationStore::new(data.conversations),
            transfers: TransferEngine::new(data.file_transfers),
            transfer_filter: DirectionFilter::default(),
            show_transfer_history: false,
            directory,
            annotations: AnnotationSession::new(data.screenshots, config.max_undo_depth),
            error_message: None,
            sink,
            config,
        })
    }

    pub fn navigate(&mut self, section: MainNav) {
        self.active_section = section;
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }

    /// Record a rejection for display and hand it back
    fn reject<T>(&mut self, err: impl Into<feiq_core::Error>) -> Result<T> {
        let err = err.into();
        warn!("{}", err);
        self.set_error(err.to_string());
        Err(err)
    }

    fn emit(&mut self, action: UiAction) {
        self.sink.emit(action);
    }

    // === Messaging ===

    pub fn select_conversation(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.conversations.select(id) {
            return self.reject(e);
        }
        self.emit(UiAction::SelectConversation {
            conversation_id: id.to_string(),
        });
        Ok(())
    }

    fn active_conversation_id(&mut self) -> Result<String> {
        match self.conversations.active_id() {
            Some(id) => Ok(id.to_string()),
            None => self.reject(MessageError::NoActiveConversation),
        }
    }

    /// Send text in the active conversation, optionally as a reply
    pub fn send_text(&mut self, content: &str, quote_id: Option<&str>) -> Result<String> {
        let conversation_id = self.active_conversation_id()?;
        let message_id = match self
            .conversations
            .send_text(&conversation_id, &self.current_user, content, quote_id)
        {
            Ok(message) => message.id.clone(),
            Err(e) => return self.reject(e),
        };

        let action = match quote_id {
            Some(quoted) => UiAction::ReplyMessage {
                conversation_id,
                message_id: message_id.clone(),
                quoted_id: quoted.to_string(),
            },
            None => UiAction::SendText {
                conversation_id,
                message_id: message_id.clone(),
            },
        };
        self.emit(action);
        Ok(message_id)
    }

    pub fn send_image(&mut self, image_url: &str, thumbnail_url: &str) -> Result<String> {
        let conversation_id = self.active_conversation_id()?;
        let message_id = match self.conversations.send_image(
            &conversation_id,
            &self.current_user,
            image_url,
            thumbnail_url,
        ) {
            Ok(message) => message.id.clone(),
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::SendImage {
            conversation_id,
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    pub fn react(&mut self, message_id: &str, emoji: &str) -> Result<()> {
        let conversation_id = self.active_conversation_id()?;
        match self
            .conversations
            .react(&conversation_id, message_id, emoji, &self.current_user)
        {
            Ok(true) => {
                self.emit(UiAction::ReactMessage {
                    conversation_id,
                    message_id: message_id.to_string(),
                    emoji: emoji.to_string(),
                });
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => self.reject(e),
        }
    }

    pub fn retract(&mut self, message_id: &str) -> Result<()> {
        let conversation_id = self.active_conversation_id()?;
        if let Err(e) = self
            .conversations
            .retract(&conversation_id, message_id, &self.current_user.id)
        {
            return self.reject(e);
        }
        self.emit(UiAction::RetractMessage {
            conversation_id,
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    /// Rows of the active thread as seen by the current user
    pub fn thread_rows(&self) -> Vec<MessageRow<'_>> {
        self.conversations
            .active()
            .map(|conv| thread_rows(&conv.messages, &self.current_user.id))
            .unwrap_or_default()
    }

    /// Pinned rows, then regular rows, both filtered by the search box
    pub fn conversation_rows(&self) -> (Vec<ConversationListRow>, Vec<ConversationListRow>) {
        let now = Utc::now();
        let active = self.conversations.active_id();
        let rows = |list: Vec<&Conversation>| {
            list.into_iter()
                .map(|c| conversation_row(c, active, now))
                .collect::<Vec<_>>()
        };
        (
            rows(self.conversations.filtered_pinned()),
            rows(self.conversations.filtered_regular()),
        )
    }

    // === File transfer ===

    fn transfer_action<F>(&mut self, id: &str, op: F, action: UiAction) -> Result<()>
    where
        F: FnOnce(&mut TransferEngine, &str) -> std::result::Result<(), TransferError>,
    {
        if let Err(e) = op(&mut self.transfers, id) {
            return self.reject(e);
        }
        self.emit(action);
        Ok(())
    }

    pub fn pause_transfer(&mut self, id: &str) -> Result<()> {
        let action = UiAction::PauseTransfer { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.pause(id).map(|_| ()), action)
    }

    pub fn resume_transfer(&mut self, id: &str) -> Result<()> {
        let action = UiAction::ResumeTransfer { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.resume(id).map(|_| ()), action)
    }

    pub fn cancel_transfer(&mut self, id: &str) -> Result<()> {
        let action = UiAction::CancelTransfer { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.cancel(id).map(|_| ()), action)
    }

    pub fn retry_transfer(&mut self, id: &str) -> Result<()> {
        let action = UiAction::RetryTransfer { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.retry(id).map(|_| ()), action)
    }

    pub fn open_folder(&mut self, id: &str) -> Result<()> {
        let viewer = self.current_user.id.clone();
        let action = UiAction::OpenFolder { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.open_folder(id, &viewer).map(|_| ()), action)
    }

    pub fn redownload(&mut self, id: &str) -> Result<()> {
        let viewer = self.current_user.id.clone();
        let action = UiAction::Redownload { transfer_id: id.to_string() };
        self.transfer_action(id, |t, id| t.redownload(id, &viewer).map(|_| ()), action)
    }

    /// Queue files dropped onto the transfer view
    pub fn send_files(&mut self, receiver_id: &str, files: &[OutgoingFile]) -> Vec<String> {
        if files.is_empty() {
            return Vec::new();
        }
        let ids = self
            .transfers
            .send_files(&self.current_user.id, receiver_id, files);
        self.emit(UiAction::SendFiles {
            receiver_id: receiver_id.to_string(),
            file_names: files.iter().map(|f| f.name.clone()).collect(),
        });
        ids
    }

    pub fn visible_transfers(&self) -> Vec<&FileTransfer> {
        self.transfers
            .visible(self.transfer_filter, self.show_transfer_history)
    }

    /// Rows for the current direction tab and history toggle
    pub fn transfer_rows(&self) -> Vec<TransferListRow> {
        self.visible_transfers()
            .into_iter()
            .map(|t| transfer_row(t, &self.users))
            .collect()
    }

    // === Organization ===

    pub fn select_department(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.directory.select_department(id) {
            return self.reject(e);
        }
        self.emit(UiAction::SelectDepartment {
            department_id: id.to_string(),
        });
        Ok(())
    }

    pub fn toggle_department(&mut self, id: &str) -> Result<bool> {
        match self.directory.toggle_expanded(id) {
            Ok(expanded) => Ok(expanded),
            Err(e) => self.reject(e),
        }
    }

    pub fn search_directory(&mut self, query: &str) {
        self.directory.set_query(query);
        self.emit(UiAction::SearchDirectory {
            query: query.to_string(),
        });
    }

    pub fn start_chat(&mut self, user_id: &str) -> Result<()> {
        if let Err(e) = self.directory.find_user(user_id) {
            return self.reject(e);
        }
        self.emit(UiAction::StartChat {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    pub fn view_details(&mut self, user_id: &str) -> Result<()> {
        if let Err(e) = self.directory.find_user(user_id) {
            return self.reject(e);
        }
        self.emit(UiAction::ViewDetails {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    pub fn department_rows(&self) -> Vec<DepartmentTreeRow> {
        department_rows(&self.directory)
    }

    // === Collaboration ===

    /// Ask the capture collaborator for a new screenshot
    pub fn take_screenshot(&mut self, screenshot_type: ScreenshotType) {
        self.emit(UiAction::TakeScreenshot { screenshot_type });
    }

    /// Accept a screenshot from the capture collaborator and open it for editing
    pub fn screenshot_captured(&mut self, screenshot: Screenshot) -> Result<()> {
        let id = screenshot.id.clone();
        self.annotations.add_screenshot(screenshot);
        self.active_section = MainNav::Collaboration;
        self.select_screenshot(&id)
    }

    pub fn select_screenshot(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.annotations.select_screenshot(id) {
            return self.reject(e);
        }
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.annotations.set_tool(tool);
    }

    fn selected_screenshot_id(&self) -> String {
        self.annotations
            .selected()
            .map(|s| s.id.clone())
            .unwrap_or_default()
    }

    pub fn add_annotation(&mut self, color: &str, shape: AnnotationShape) -> Result<String> {
        let id = match self.annotations.add_annotation(color, shape.clone()) {
            Ok(id) => id,
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::AddAnnotation {
            screenshot_id: self.selected_screenshot_id(),
            shape,
        });
        Ok(id)
    }

    pub fn delete_annotation(&mut self, annotation_id: &str) -> Result<()> {
        if let Err(e) = self.annotations.delete_annotation(annotation_id) {
            return self.reject(e);
        }
        self.emit(UiAction::DeleteAnnotation {
            screenshot_id: self.selected_screenshot_id(),
            annotation_id: annotation_id.to_string(),
        });
        Ok(())
    }

    pub fn undo(&mut self) {
        if self.annotations.can_undo() {
            self.annotations.undo();
            self.emit(UiAction::Undo);
        }
    }

    pub fn redo(&mut self) {
        if self.annotations.can_redo() {
            self.annotations.redo();
            self.emit(UiAction::Redo);
        }
    }

    pub fn save_screenshot(&mut self) -> Result<()> {
        let screenshot_id = match self.annotations.save() {
            Ok(s) => s.id.clone(),
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::SaveScreenshot { screenshot_id });
        Ok(())
    }

    pub fn copy_screenshot(&mut self) -> Result<()> {
        let screenshot_id = match self.annotations.copy() {
            Ok(s) => s.id.clone(),
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::CopyScreenshot { screenshot_id });
        Ok(())
    }

    pub fn send_screenshot_to_contact(&mut self, contact_id: &str) -> Result<()> {
        let screenshot_id = match self.annotations.send_to_contact(contact_id) {
            Ok(s) => s.id.clone(),
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::SendToContact {
            screenshot_id,
            contact_id: contact_id.to_string(),
        });
        Ok(())
    }

    pub fn send_screenshot_to_chat(&mut self, conversation_id: &str) -> Result<()> {
        let screenshot_id = match self.annotations.send_to_chat(conversation_id) {
            Ok(s) => s.id.clone(),
            Err(e) => return self.reject(e),
        };
        self.emit(UiAction::SendToChat {
            screenshot_id,
            conversation_id: conversation_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feiq_core::{MessageStatus, Point, RecordingActionSink, ScreenshotStatus, TransferStatus};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink shared with the test so emitted actions can be inspected
    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<RecordingActionSink>>);

    impl ActionSink for SharedSink {
        fn emit(&mut self, action: UiAction) {
            self.0.borrow_mut().emit(action);
        }
    }

    fn state() -> (AppState, SharedSink) {
        let sink = SharedSink::default();
        let data = MockData::from_json(crate::DEMO_DATA).unwrap();
        let state = AppState::new(AppConfig::default(), data, Box::new(sink.clone())).unwrap();
        (state, sink)
    }

    #[test]
    fn test_demo_state_loads() {
        let (state, _) = state();
        assert_eq!(state.current_user.id, "user-1");
        assert_eq!(state.active_section, MainNav::Messaging);
        assert!(!state.department_rows().is_empty());
        assert!(state.thread_rows().is_empty());
    }

    #[test]
    fn test_locale_selects_department_order() {
        let data = MockData::from_json(crate::DEMO_DATA).unwrap();
        let zh = AppState::new(AppConfig::default(), data.clone(), Box::new(SharedSink::default()))
            .unwrap();
        let names: Vec<_> = zh.department_rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["飞秋科技", "技术部", "人事部", "市场部"]);

        let config = AppConfig {
            locale: "en-US".to_string(),
            ..AppConfig::default()
        };
        let en = AppState::new(config, data, Box::new(SharedSink::default())).unwrap();
        assert_eq!(en.directory.collation(), Collation::CodePoint);
        let names: Vec<_> = en.department_rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["飞秋科技", "人事部", "市场部", "技术部"]);
    }

    #[test]
    fn test_send_requires_active_conversation() {
        let (mut state, sink) = state();
        assert!(state.send_text("hi", None).is_err());
        assert!(state.error_message.is_some());
        assert!(sink.0.borrow().actions().is_empty());
    }

    #[test]
    fn test_send_and_reply_emit_actions() {
        let (mut state, sink) = state();
        let conv_id = state.conversations.conversations()[0].id.clone();
        state.select_conversation(&conv_id).unwrap();

        let first = state.send_text("你好", None).unwrap();
        state.send_text("回复一下", Some(&first)).unwrap();

        let actions = sink.0.borrow_mut().take();
        assert!(matches!(actions[0], UiAction::SelectConversation { .. }));
        assert!(matches!(actions[1], UiAction::SendText { .. }));
        assert!(matches!(actions[2], UiAction::ReplyMessage { ref quoted_id, .. } if *quoted_id == first));

        let rows = state.thread_rows();
        let last = rows.last().unwrap();
        assert!(last.is_sent);
        assert!(!last.show_avatar);
        assert_eq!(last.message.status, MessageStatus::Sending);
    }

    #[test]
    fn test_duplicate_reaction_emits_once() {
        let (mut state, sink) = state();
        let conv_id = state.conversations.conversations()[0].id.clone();
        state.select_conversation(&conv_id).unwrap();
        let id = state.send_text("看这里", None).unwrap();
        sink.0.borrow_mut().take();

        state.react(&id, "👍").unwrap();
        state.react(&id, "👍").unwrap();
        assert_eq!(sink.0.borrow().actions().len(), 1);
    }

    #[test]
    fn test_rejected_transfer_action_emits_nothing() {
        let (mut state, sink) = state();
        let completed = state
            .transfers
            .all()
            .iter()
            .find(|t| t.status == TransferStatus::Completed)
            .map(|t| t.id.clone())
            .unwrap();

        assert!(state.pause_transfer(&completed).is_err());
        assert!(sink.0.borrow().actions().is_empty());
    }

    #[test]
    fn test_pause_then_cancel() {
        let (mut state, sink) = state();
        let running = state
            .transfers
            .all()
            .iter()
            .find(|t| t.status == TransferStatus::Transferring)
            .map(|t| t.id.clone())
            .unwrap();

        state.pause_transfer(&running).unwrap();
        state.cancel_transfer(&running).unwrap();
        assert_eq!(sink.0.borrow().actions().len(), 2);

        state.show_transfer_history = true;
        assert!(state.visible_transfers().iter().any(|t| t.id == running));
    }

    #[test]
    fn test_transfer_rows_follow_toggle() {
        let (mut state, _) = state();
        let active = state.transfer_rows();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|r| r.telemetry.is_some()));
        let design = active.iter().find(|r| r.id == "transfer-1").unwrap();
        assert_eq!(design.peer_name, "李四");

        state.show_transfer_history = true;
        let history = state.transfer_rows();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.telemetry.is_none()));
    }

    #[test]
    fn test_send_files_skips_empty_selection() {
        let (mut state, sink) = state();
        assert!(state.send_files("user-2", &[]).is_empty());
        assert!(sink.0.borrow().actions().is_empty());

        let ids = state.send_files("user-2", &[OutgoingFile::new("方案.docx", 2048)]);
        assert_eq!(ids.len(), 1);
        assert_eq!(sink.0.borrow().actions().len(), 1);
    }

    #[test]
    fn test_directory_actions() {
        let (mut state, sink) = state();
        state.select_department("dept-tech").unwrap();
        state.search_directory("张");
        assert!(state.start_chat("nobody").is_err());

        let actions = sink.0.borrow_mut().take();
        assert_eq!(actions.len(), 2);
        assert!(state.directory.filtered_users().iter().all(|u| u.name.contains('张')));
    }

    #[test]
    fn test_captured_screenshot_opens_for_editing() {
        let (mut state, sink) = state();
        state.take_screenshot(ScreenshotType::Window);

        state
            .screenshot_captured(Screenshot {
                id: "shot-new".to_string(),
                screenshot_type: ScreenshotType::Window,
                title: "聊天窗口".to_string(),
                image_url: "screenshots/new.png".to_string(),
                thumbnail_url: "screenshots/new-thumb.png".to_string(),
                created_at: Utc::now(),
                created_by: "user-1".to_string(),
                annotations: Vec::new(),
                status: ScreenshotStatus::Draft,
                sent_to: None,
            })
            .unwrap();

        assert_eq!(state.active_section, MainNav::Collaboration);
        assert_eq!(state.annotations.screenshots()[0].id, "shot-new");
        assert_eq!(state.annotations.selected().map(|s| s.id.as_str()), Some("shot-new"));
        assert!(state.annotations.annotations().is_empty());
        assert_eq!(
            sink.0.borrow().actions(),
            &[UiAction::TakeScreenshot {
                screenshot_type: ScreenshotType::Window
            }]
        );
    }

    #[test]
    fn test_annotation_flow() {
        let (mut state, sink) = state();
        let shot = state.annotations.screenshots()[0].id.clone();
        state.select_screenshot(&shot).unwrap();
        let before = state.annotations.annotations().len();

        state.set_tool(Tool::Arrow);
        state
            .add_annotation("#ef4444", AnnotationShape::arrow(Point::new(0.0, 0.0), Point::new(5.0, 5.0)))
            .unwrap();
        state.undo();
        state.undo();
        state.redo();
        state.save_screenshot().unwrap();

        let actions = sink.0.borrow_mut().take();
        let kinds: Vec<_> = actions
            .iter()
            .map(|a| match a {
                UiAction::AddAnnotation { .. } => "add",
                UiAction::Undo => "undo",
                UiAction::Redo => "redo",
                UiAction::SaveScreenshot { .. } => "save",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["add", "undo", "redo", "save"]);
        assert_eq!(state.annotations.annotations().len(), before + 1);
    }
}
