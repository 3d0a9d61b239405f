//! Screenshot annotation session with undo/redo

use tracing::{debug, info};

use crate::error::AnnotationError;
use crate::types::{Annotation, AnnotationShape, Screenshot, ScreenshotStatus, Tool};

type AnnotationResult<T> = std::result::Result<T, AnnotationError>;

/// Default number of undo snapshots kept
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// Bounded snapshot history of annotation lists
#[derive(Debug, Clone)]
struct History {
    undo: Vec<Vec<Annotation>>,
    redo: Vec<Vec<Annotation>>,
    max_depth: usize,
}

impl History {
    fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    fn record(&mut self, before: Vec<Annotation>) {
        if self.undo.len() == self.max_depth {
            self.undo.remove(0);
        }
        self.undo.push(before);
        self.redo.clear();
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// Annotation editing over the selected screenshot
#[derive(Debug)]
pub struct AnnotationSession {
    screenshots: Vec<Screenshot>,
    selected_id: Option<String>,
    annotations: Vec<Annotation>,
    tool: Tool,
    history: History,
}

impl AnnotationSession {
    pub fn new(screenshots: Vec<Screenshot>, max_undo_depth: usize) -> Self {
        Self {
            screenshots,
            selected_id: None,
            annotations: Vec::new(),
            tool: Tool::default(),
            history: History::new(max_undo_depth),
        }
    }

    pub fn screenshots(&self) -> &[Screenshot] {
        &self.screenshots
    }

    pub fn screenshot(&self, id: &str) -> Option<&Screenshot> {
        self.screenshots.iter().find(|s| s.id == id)
    }

    pub fn selected(&self) -> Option<&Screenshot> {
        self.selected_id.as_deref().and_then(|id| self.screenshot(id))
    }

    /// Open a screenshot for editing; history starts empty
    pub fn select_screenshot(&mut self, id: &str) -> AnnotationResult<&Screenshot> {
        let screenshot = self
            .screenshots
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AnnotationError::ScreenshotNotFound(id.to_string()))?;

        self.annotations = screenshot.annotations.clone();
        self.selected_id = Some(id.to_string());
        self.history.clear();
        debug!("Editing screenshot {} ({} annotations)", id, self.annotations.len());
        Ok(screenshot)
    }

    /// Add a screenshot produced by the capture collaborator
    pub fn add_screenshot(&mut self, screenshot: Screenshot) {
        info!("New {:?} screenshot {}", screenshot.screenshot_type, screenshot.id);
        self.screenshots.insert(0, screenshot);
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Change the drawing tool; not recorded in history
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    fn require_selection(&self) -> AnnotationResult<&str> {
        self.selected_id
            .as_deref()
            .ok_or(AnnotationError::NoScreenshotSelected)
    }

    /// Add an annotation, returning its id
    pub fn add_annotation(
        &mut self,
        color: impl Into<String>,
        shape: AnnotationShape,
    ) -> AnnotationResult<String> {
        self.require_selection()?;
        shape.validate()?;

        let id = uuid::Uuid::new_v4().to_string();
        self.history.record(self.annotations.clone());
        self.annotations.push(Annotation {
            id: id.clone(),
            color: color.into(),
            shape,
        });
        debug!("Added annotation {}", id);
        Ok(id)
    }

    pub fn delete_annotation(&mut self, id: &str) -> AnnotationResult<Annotation> {
        self.require_selection()?;
        let position = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AnnotationError::AnnotationNotFound(id.to_string()))?;

        self.history.record(self.annotations.clone());
        Ok(self.annotations.remove(position))
    }

    pub fn can_undo(&self) -> bool {
        !self.history.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    /// Restore the previous list; no-op on empty history
    pub fn undo(&mut self) -> &[Annotation] {
        if let Some(previous) = self.history.undo.pop() {
            let current = std::mem::replace(&mut self.annotations, previous);
            self.history.redo.push(current);
        }
        &self.annotations
    }

    /// Re-apply the last undone change; no-op on empty history
    pub fn redo(&mut self) -> &[Annotation] {
        if let Some(next) = self.history.redo.pop() {
            let current = std::mem::replace(&mut self.annotations, next);
            self.history.undo.push(current);
        }
        &self.annotations
    }

    /// Write the current list into the selected screenshot
    fn commit(&mut self, status: Option<ScreenshotStatus>) -> AnnotationResult<&Screenshot> {
        let id = self.require_selection()?.to_string();
        let annotations = self.annotations.clone();
        let screenshot = self
            .screenshots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AnnotationError::ScreenshotNotFound(id.clone()))?;

        screenshot.annotations = annotations;
        if let Some(status) = status {
            screenshot.status = status;
        }
        Ok(&*screenshot)
    }

    pub fn save(&mut self) -> AnnotationResult<&Screenshot> {
        let screenshot = self.commit(Some(ScreenshotStatus::Saved))?;
        info!("Saved screenshot {}", screenshot.id);
        Ok(screenshot)
    }

    /// Snapshot for the clipboard; status is unchanged
    pub fn copy(&mut self) -> AnnotationResult<&Screenshot> {
        self.commit(None)
    }

    pub fn send_to_contact(&mut self, contact_id: &str) -> AnnotationResult<&Screenshot> {
        self.send(contact_id)
    }

    pub fn send_to_chat(&mut self, conversation_id: &str) -> AnnotationResult<&Screenshot> {
        self.send(conversation_id)
    }

    fn send(&mut self, target: &str) -> AnnotationResult<&Screenshot> {
        self.commit(Some(ScreenshotStatus::Sent))?;
        let id = self.require_selection()?.to_string();
        let screenshot = self
            .screenshots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AnnotationError::ScreenshotNotFound(id.clone()))?;
        screenshot.sent_to = Some(target.to_string());
        info!("Sent screenshot {} to {}", screenshot.id, target);
        Ok(&*screenshot)
    }
}
