//! File transfer lifecycle engine

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::TransferError;
use crate::types::{file_extension, FileTransfer, TransferDirection, TransferStatus};

type TransferResult<T> = std::result::Result<T, TransferError>;

/// Direction tab in the transfer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionFilter {
    #[default]
    All,
    Sending,
    Receiving,
}

impl DirectionFilter {
    fn accepts(&self, direction: TransferDirection) -> bool {
        match self {
            Self::All => true,
            Self::Sending => direction == TransferDirection::Send,
            Self::Receiving => direction == TransferDirection::Receive,
        }
    }
}

/// Aggregate telemetry over active transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferStats {
    pub active_count: usize,
    /// Bytes per second, summed
    pub total_speed: u64,
}

/// A file picked for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFile {
    pub name: String,
    pub size: u64,
}

impl OutgoingFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Owns every transfer and enforces the allowed transitions
///
/// Transitions:
///
/// ```text
/// waiting ──> transferring ──> paused ──> transferring
///    │             │  │          │
///    │             │  └──> completed
///    │             └─────> failed ──(retry)──> transferring
///    └──────> cancelled <──────────┘ (from waiting, transferring, paused)
/// ```
#[derive(Debug, Default)]
pub struct TransferEngine {
    transfers: Vec<FileTransfer>,
}

impl TransferEngine {
    pub fn new(transfers: Vec<FileTransfer>) -> Self {
        Self { transfers }
    }

    pub fn all(&self) -> &[FileTransfer] {
        &self.transfers
    }

    pub fn get(&self, id: &str) -> Option<&FileTransfer> {
        self.transfers.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> TransferResult<&mut FileTransfer> {
        self.transfers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TransferError::NotFound(id.to_string()))
    }

    /// Apply `f` if the transfer is in one of `allowed`, otherwise reject untouched
    fn transition<F>(
        &mut self,
        id: &str,
        action: &'static str,
        allowed: &[TransferStatus],
        f: F,
    ) -> TransferResult<&FileTransfer>
    where
        F: FnOnce(&mut FileTransfer),
    {
        let transfer = self.get_mut(id)?;
        if !allowed.contains(&transfer.status) {
            warn!("Rejected {} on transfer {} ({:?})", action, id, transfer.status);
            return Err(TransferError::InvalidTransition {
                id: id.to_string(),
                action,
                status: transfer.status,
            });
        }

        let from = transfer.status;
        f(&mut *transfer);
        info!("Transfer {}: {:?} -> {:?} ({})", id, from, transfer.status, action);
        Ok(&*transfer)
    }

    /// Pause a running transfer, freezing its telemetry
    pub fn pause(&mut self, id: &str) -> TransferResult<&FileTransfer> {
        self.transition(id, "pause", &[TransferStatus::Transferring], |t| {
            t.status = TransferStatus::Paused;
        })
    }

    pub fn resume(&mut self, id: &str) -> TransferResult<&FileTransfer> {
        self.transition(id, "resume", &[TransferStatus::Paused], |t| {
            t.status = TransferStatus::Transferring;
        })
    }

    /// Cancel an active transfer; progress is kept for the history view
    pub fn cancel(&mut self, id: &str) -> TransferResult<&FileTransfer> {
        self.transition(
            id,
            "cancel",
            &[
                TransferStatus::Waiting,
                TransferStatus::Transferring,
                TransferStatus::Paused,
            ],
            |t| {
                t.status = TransferStatus::Cancelled;
                t.end_time = Some(Utc::now());
            },
        )
    }

    /// Restart a failed transfer as a fresh attempt under the same id
    pub fn retry(&mut self, id: &str) -> TransferResult<&FileTransfer> {
        self.transition(id, "retry", &[TransferStatus::Failed], |t| {
            t.status = TransferStatus::Transferring;
            t.error_message = None;
            t.progress = 0.0;
            t.transfer_speed = 0;
            t.start_time = Utc::now();
            t.end_time = None;
        })
    }

    /// Feed telemetry from the transport collaborator
    ///
    /// A waiting transfer starts transferring on its first update. Reaching
    /// 100 completes the transfer.
    pub fn update_progress(
        &mut self,
        id: &str,
        progress: f64,
        speed: u64,
        remaining_time: f64,
    ) -> TransferResult<&FileTransfer> {
        if !progress.is_finite() || !(0.0..=100.0).contains(&progress) {
            warn!("Rejected progress {} for transfer {}", progress, id);
            return Err(TransferError::ProgressOutOfRange(progress));
        }

        let reached_end = progress >= 100.0;
        self.transition(
            id,
            "update progress",
            &[TransferStatus::Waiting, TransferStatus::Transferring],
            |t| {
                t.status = TransferStatus::Transferring;
                t.progress = progress;
                t.transfer_speed = speed;
                t.remaining_time = remaining_time.max(0.0);
            },
        )?;

        if reached_end {
            return self.complete(id);
        }
        self.get_mut(id).map(|t| &*t)
    }

    /// Mark a running transfer as done
    pub fn complete(&mut self, id: &str) -> TransferResult<&FileTransfer> {
        self.transition(id, "complete", &[TransferStatus::Transferring], |t| {
            t.status = TransferStatus::Completed;
            t.progress = 100.0;
            t.transfer_speed = 0;
            t.remaining_time = 0.0;
            t.end_time = Some(Utc::now());
        })
    }

    /// Record a transport failure
    pub fn fail(&mut self, id: &str, message: impl Into<String>) -> TransferResult<&FileTransfer> {
        let message = message.into();
        self.transition(
            id,
            "fail",
            &[TransferStatus::Waiting, TransferStatus::Transferring],
            |t| {
                t.status = TransferStatus::Failed;
                t.error_message = Some(message);
                t.transfer_speed = 0;
                t.end_time = Some(Utc::now());
            },
        )
    }

    /// Check that a completed transfer may be opened in its folder (own sends only)
    pub fn open_folder(&self, id: &str, viewer_id: &str) -> TransferResult<&FileTransfer> {
        self.completed_for(id, "open folder", |t| t.sender_id == viewer_id)
    }

    /// Check that a completed transfer may be downloaded again (received files only)
    pub fn redownload(&self, id: &str, viewer_id: &str) -> TransferResult<&FileTransfer> {
        self.completed_for(id, "redownload", |t| t.sender_id != viewer_id)
    }

    fn completed_for<F>(
        &self,
        id: &str,
        action: &'static str,
        owner_ok: F,
    ) -> TransferResult<&FileTransfer>
    where
        F: Fn(&FileTransfer) -> bool,
    {
        let transfer = self
            .get(id)
            .ok_or_else(|| TransferError::NotFound(id.to_string()))?;
        if transfer.status != TransferStatus::Completed || !owner_ok(transfer) {
            return Err(TransferError::InvalidTransition {
                id: id.to_string(),
                action,
                status: transfer.status,
            });
        }
        Ok(transfer)
    }

    /// Queue outgoing files as waiting transfers
    pub fn send_files(
        &mut self,
        sender_id: &str,
        receiver_id: &str,
        files: &[OutgoingFile],
    ) -> Vec<String> {
        let now = Utc::now();
        let mut ids = Vec::with_capacity(files.len());

        for file in files {
            let id = uuid::Uuid::new_v4().to_string();
            debug!("Queueing {} ({} bytes) as {}", file.name, file.size, id);
            self.transfers.push(FileTransfer {
                id: id.clone(),
                direction: TransferDirection::Send,
                sender_id: sender_id.to_string(),
                receiver_id: receiver_id.to_string(),
                file_name: file.name.clone(),
                file_size: file.size,
                file_type: file_extension(&file.name),
                status: TransferStatus::Waiting,
                progress: 0.0,
                transfer_speed: 0,
                remaining_time: 0.0,
                start_time: now,
                end_time: None,
                error_message: None,
            });
            ids.push(id);
        }

        info!("Queued {} file(s) for {}", ids.len(), receiver_id);
        ids
    }

    /// Waiting, transferring or paused transfers
    pub fn active(&self) -> Vec<&FileTransfer> {
        self.transfers.iter().filter(|t| t.status.is_active()).collect()
    }

    /// Completed, cancelled or failed transfers
    pub fn history(&self) -> Vec<&FileTransfer> {
        self.transfers.iter().filter(|t| t.status.is_history()).collect()
    }

    /// The list shown for a direction tab and the history toggle
    pub fn visible(&self, filter: DirectionFilter, show_history: bool) -> Vec<&FileTransfer> {
        self.transfers
            .iter()
            .filter(|t| t.status.is_history() == show_history)
            .filter(|t| filter.accepts(t.direction))
            .collect()
    }

    pub fn stats(&self) -> TransferStats {
        let active = self.active();
        TransferStats {
            active_count: active.len(),
            total_speed: active
                .iter()
                .map(|t| t.transfer_speed)
                .fold(0u64, u64::saturating_add),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transfer(id: &str, status: TransferStatus, progress: f64) -> FileTransfer {
        FileTransfer {
            id: id.to_string(),
            direction: TransferDirection::Send,
            sender_id: "user-1".to_string(),
            receiver_id: "user-2".to_string(),
            file_name: format!("{}.pdf", id),
            file_size: 2 * 1024 * 1024,
            file_type: "pdf".to_string(),
            status,
            progress,
            transfer_speed: if status == TransferStatus::Transferring { 512 * 1024 } else { 0 },
            remaining_time: 1.0,
            start_time: Utc::now(),
            end_time: None,
            error_message: None,
        }
    }

    fn every_status() -> Vec<TransferStatus> {
        vec![
            TransferStatus::Waiting,
            TransferStatus::Transferring,
            TransferStatus::Paused,
            TransferStatus::Completed,
            TransferStatus::Cancelled,
            TransferStatus::Failed,
        ]
    }

    /// Run `action` on a transfer in every status; only `allowed` may succeed
    /// and a rejected call must leave the transfer untouched
    fn assert_accepted_only_from<F>(action: F, allowed: &[TransferStatus])
    where
        F: Fn(&mut TransferEngine) -> bool,
    {
        for status in every_status() {
            let mut engine = TransferEngine::new(vec![transfer("t1", status, 30.0)]);
            let before = engine.get("t1").unwrap().clone();

            let accepted = action(&mut engine);
            assert_eq!(accepted, allowed.contains(&status), "from {:?}", status);
            if !accepted {
                assert_eq!(engine.get("t1").unwrap(), &before, "from {:?}", status);
            }
        }
    }

    #[test]
    fn test_resume_only_from_paused() {
        assert_accepted_only_from(|e| e.resume("t1").is_ok(), &[TransferStatus::Paused]);
    }

    #[test]
    fn test_cancel_only_from_active_states() {
        assert_accepted_only_from(
            |e| e.cancel("t1").is_ok(),
            &[
                TransferStatus::Waiting,
                TransferStatus::Transferring,
                TransferStatus::Paused,
            ],
        );
    }

    #[test]
    fn test_retry_only_from_failed() {
        assert_accepted_only_from(|e| e.retry("t1").is_ok(), &[TransferStatus::Failed]);
    }

    #[test]
    fn test_complete_only_from_transferring() {
        assert_accepted_only_from(|e| e.complete("t1").is_ok(), &[TransferStatus::Transferring]);
    }

    #[test]
    fn test_fail_only_while_moving_bytes() {
        assert_accepted_only_from(
            |e| e.fail("t1", "超时").is_ok(),
            &[TransferStatus::Waiting, TransferStatus::Transferring],
        );
    }

    #[test]
    fn test_pause_then_resume_keeps_identity() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Transferring, 40.0)]);
        let before = engine.get("t1").unwrap().clone();

        engine.pause("t1").unwrap();
        let after = engine.resume("t1").unwrap();

        assert_eq!(after.status, TransferStatus::Transferring);
        assert_eq!(after.id, before.id);
        assert_eq!(after.file_name, before.file_name);
        assert_eq!(after.file_size, before.file_size);
        assert_eq!(after.progress, 40.0);
    }

    #[test]
    fn test_pause_rejected_unless_transferring() {
        for status in every_status() {
            if status == TransferStatus::Transferring {
                continue;
            }
            let mut engine = TransferEngine::new(vec![transfer("t1", status, 10.0)]);
            let err = engine.pause("t1").unwrap_err();
            assert!(matches!(err, TransferError::InvalidTransition { .. }));
            assert_eq!(engine.get("t1").unwrap().status, status);
        }
    }

    #[test]
    fn test_update_progress_ignored_outside_active_window() {
        for status in [
            TransferStatus::Completed,
            TransferStatus::Cancelled,
            TransferStatus::Failed,
            TransferStatus::Paused,
        ] {
            let mut engine = TransferEngine::new(vec![transfer("t1", status, 30.0)]);
            let before = engine.get("t1").unwrap().clone();

            assert!(engine.update_progress("t1", 50.0, 1000, 2.0).is_err());
            assert_eq!(engine.get("t1").unwrap(), &before);
        }
    }

    #[test]
    fn test_update_progress_rejects_out_of_range() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Transferring, 30.0)]);

        assert_eq!(
            engine.update_progress("t1", 120.0, 1, 0.0).unwrap_err(),
            TransferError::ProgressOutOfRange(120.0)
        );
        assert!(engine.update_progress("t1", -1.0, 1, 0.0).is_err());
        assert!(engine.update_progress("t1", f64::NAN, 1, 0.0).is_err());
        assert_eq!(engine.get("t1").unwrap().progress, 30.0);
    }

    #[test]
    fn test_first_update_starts_waiting_transfer() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Waiting, 0.0)]);

        let t = engine.update_progress("t1", 5.0, 2048, 3.0).unwrap();
        assert_eq!(t.status, TransferStatus::Transferring);
        assert_eq!(t.transfer_speed, 2048);
    }

    #[test]
    fn test_progress_at_100_completes() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Transferring, 90.0)]);

        let t = engine.update_progress("t1", 100.0, 4096, 0.0).unwrap();
        assert_eq!(t.status, TransferStatus::Completed);
        assert_eq!(t.progress, 100.0);
        assert!(t.end_time.is_some());
    }

    #[test]
    fn test_cancel_moves_transfer_to_history() {
        let mut engine = TransferEngine::new(vec![
            transfer("t1", TransferStatus::Transferring, 40.0),
            transfer("t2", TransferStatus::Completed, 100.0),
        ]);

        let active: Vec<_> = engine.active().iter().map(|t| t.id.clone()).collect();
        assert_eq!(active, vec!["t1"]);

        let t1 = engine.cancel("t1").unwrap();
        assert_eq!(t1.status, TransferStatus::Cancelled);
        assert!(t1.end_time.is_some());
        assert_eq!(t1.progress, 40.0);

        assert!(engine.active().is_empty());
        let history: Vec<_> = engine.history().iter().map(|t| t.id.clone()).collect();
        assert_eq!(history, vec!["t1", "t2"]);
    }

    #[test]
    fn test_cancel_rejected_on_terminal() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Completed, 100.0)]);
        assert!(engine.cancel("t1").is_err());
    }

    #[test]
    fn test_retry_resets_failed_attempt() {
        let mut failed = transfer("t1", TransferStatus::Failed, 62.0);
        failed.error_message = Some("连接中断".to_string());
        let mut engine = TransferEngine::new(vec![failed]);

        let t = engine.retry("t1").unwrap();
        assert_eq!(t.status, TransferStatus::Transferring);
        assert_eq!(t.error_message, None);
        assert_eq!(t.progress, 0.0);

        assert!(engine.retry("t1").is_err());
    }

    #[test]
    fn test_fail_records_message() {
        let mut engine = TransferEngine::new(vec![transfer("t1", TransferStatus::Transferring, 10.0)]);
        let t = engine.fail("t1", "对方已离线").unwrap();
        assert_eq!(t.status, TransferStatus::Failed);
        assert_eq!(t.error_message.as_deref(), Some("对方已离线"));
    }

    #[test]
    fn test_unknown_id() {
        let mut engine = TransferEngine::default();
        assert_eq!(
            engine.resume("nope").unwrap_err(),
            TransferError::NotFound("nope".to_string())
        );
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let transfers: Vec<_> = every_status()
            .into_iter()
            .enumerate()
            .map(|(i, s)| transfer(&format!("t{}", i), s, 0.0))
            .collect();
        let engine = TransferEngine::new(transfers);

        let active: Vec<_> = engine.active().iter().map(|t| t.id.clone()).collect();
        let history: Vec<_> = engine.history().iter().map(|t| t.id.clone()).collect();

        assert!(active.iter().all(|id| !history.contains(id)));
        assert_eq!(active.len() + history.len(), engine.all().len());
    }

    #[test]
    fn test_stats_count_zero_speed_transfers() {
        let engine = TransferEngine::new(vec![
            transfer("t1", TransferStatus::Transferring, 10.0),
            transfer("t2", TransferStatus::Waiting, 0.0),
            transfer("t3", TransferStatus::Paused, 50.0),
            transfer("t4", TransferStatus::Completed, 100.0),
        ]);

        assert_eq!(
            engine.stats(),
            TransferStats {
                active_count: 3,
                total_speed: 512 * 1024,
            }
        );
    }

    #[test]
    fn test_stats_speed_saturates() {
        let mut fast = transfer("t1", TransferStatus::Transferring, 10.0);
        fast.transfer_speed = u64::MAX - 1;
        let mut faster = transfer("t2", TransferStatus::Transferring, 10.0);
        faster.transfer_speed = u64::MAX - 1;
        let engine = TransferEngine::new(vec![fast, faster]);

        assert_eq!(engine.stats().total_speed, u64::MAX);
    }

    #[test]
    fn test_visible_by_direction_and_history() {
        let mut incoming = transfer("t2", TransferStatus::Transferring, 10.0);
        incoming.direction = TransferDirection::Receive;
        let engine = TransferEngine::new(vec![
            transfer("t1", TransferStatus::Transferring, 10.0),
            incoming,
            transfer("t3", TransferStatus::Failed, 10.0),
        ]);

        let ids = |v: Vec<&FileTransfer>| v.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(engine.visible(DirectionFilter::All, false)), vec!["t1", "t2"]);
        assert_eq!(ids(engine.visible(DirectionFilter::Receiving, false)), vec!["t2"]);
        assert_eq!(ids(engine.visible(DirectionFilter::Sending, true)), vec!["t3"]);
    }

    #[test]
    fn test_send_files_queues_waiting() {
        let mut engine = TransferEngine::default();
        let ids = engine.send_files(
            "user-1",
            "user-2",
            &[OutgoingFile::new("季度报告.PDF", 1024), OutgoingFile::new("logo.png", 10)],
        );

        assert_eq!(ids.len(), 2);
        let first = engine.get(&ids[0]).unwrap();
        assert_eq!(first.status, TransferStatus::Waiting);
        assert_eq!(first.file_type, "pdf");
        assert_eq!(first.direction, TransferDirection::Send);
        assert_eq!(engine.stats().active_count, 2);
    }

    #[test]
    fn test_open_folder_and_redownload() {
        let mut received = transfer("t2", TransferStatus::Completed, 100.0);
        received.sender_id = "user-2".to_string();
        received.receiver_id = "user-1".to_string();
        let engine = TransferEngine::new(vec![
            transfer("t1", TransferStatus::Completed, 100.0),
            received,
            transfer("t3", TransferStatus::Transferring, 20.0),
        ]);

        assert!(engine.open_folder("t1", "user-1").is_ok());
        assert!(engine.redownload("t1", "user-1").is_err());
        assert!(engine.redownload("t2", "user-1").is_ok());
        assert!(engine.open_folder("t3", "user-1").is_err());
    }
}
