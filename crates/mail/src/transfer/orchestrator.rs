//! Transfer orchestrator
//!
//! Drives one run: validates the destination, plans batches, moves every item
//! with bounded throttle retry, and gates each batch boundary on the quota
//! gate and the continuation decision.

use log::{debug, info, warn};
use std::time::Duration;

use super::confirm::{ConfirmMode, Continuation, Decision, PromptContinuation};
use super::progress::{ItemProgress, ProgressObserver};
use super::quota::QuotaGate;
use super::retry::move_with_retry;
use super::TransferError;
use super::timing::{Sleeper, ThreadSleeper};
use crate::audit::AuditSink;
use crate::batch::{Batch, plan};
use crate::models::{FolderHandle, MailItem, TransferRecord};
use crate::remote::RemoteMailClient;

/// Default batch size threshold: 90 GiB
pub const DEFAULT_BATCH_THRESHOLD: u64 = 96_636_764_160;

/// Default wait between target item-count polls
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(300);

/// Session values a run needs besides its items.
///
/// Created by the connect step and passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferContext {
    /// Mailbox the items are moved out of
    pub source_mailbox: String,
    /// Identity recorded in audit records
    pub acting_user: String,
}

impl TransferContext {
    pub fn new(source_mailbox: impl Into<String>, acting_user: impl Into<String>) -> Self {
        Self {
            source_mailbox: source_mailbox.into(),
            acting_user: acting_user.into(),
        }
    }
}

/// Tunables for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Batch is closed once its accumulated size reaches this many bytes
    pub threshold: u64,
    /// Wait between polls of the target item count
    pub wait_time: Duration,
    /// Wait for the target folder to drain between batches
    pub check_target_empty: bool,
    pub confirm: ConfirmMode,
    /// Give up waiting for the target to drain after this long. None waits forever.
    pub quota_timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BATCH_THRESHOLD,
            wait_time: DEFAULT_WAIT_TIME,
            check_target_empty: true,
            confirm: ConfirmMode::Interactive,
            quota_timeout: None,
        }
    }
}

/// What a run did, whatever its outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub items_moved: usize,
    pub batches_planned: usize,
    pub batches_completed: usize,
    pub throttle_retries: u32,
    /// Where audit records were written, when logging was enabled
    pub audit_location: Option<String>,
}

/// Terminal state of a run
#[derive(Debug)]
pub enum TransferOutcome {
    /// Every batch was moved
    Completed(TransferReport),
    /// The operator declined to continue at a batch boundary
    Aborted(TransferReport),
    /// A fatal error stopped the run; items already moved stay moved
    Failed {
        error: TransferError,
        report: TransferReport,
    },
}

impl TransferOutcome {
    pub fn report(&self) -> &TransferReport {
        match self {
            Self::Completed(report) | Self::Aborted(report) => report,
            Self::Failed { report, .. } => report,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

enum Finish {
    Completed,
    Aborted,
}

/// Moves items into a target folder batch by batch
pub struct TransferOrchestrator<'a> {
    client: &'a dyn RemoteMailClient,
    context: &'a TransferContext,
    options: TransferOptions,
    sleeper: &'a dyn Sleeper,
    continuation: Option<&'a mut dyn Continuation>,
    progress: Option<&'a mut dyn ProgressObserver>,
    audit: Option<&'a mut dyn AuditSink>,
}

impl<'a> TransferOrchestrator<'a> {
    /// Create an orchestrator that sleeps on the current thread, prompts on
    /// stdin in interactive mode and writes no audit records
    pub fn new(
        client: &'a dyn RemoteMailClient,
        context: &'a TransferContext,
        options: TransferOptions,
    ) -> Self {
        Self {
            client,
            context,
            options,
            sleeper: &ThreadSleeper,
            continuation: None,
            progress: None,
            audit: None,
        }
    }

    pub fn with_sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Prompt used in interactive mode
    pub fn with_continuation(mut self, continuation: &'a mut dyn Continuation) -> Self {
        self.continuation = Some(continuation);
        self
    }

    pub fn with_progress(mut self, progress: &'a mut dyn ProgressObserver) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Enable audit logging
    pub fn with_audit(mut self, audit: &'a mut dyn AuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Move `items` into `target_folder` of `target_mailbox`
    pub fn run(
        &mut self,
        items: &[MailItem],
        target_mailbox: &str,
        target_folder: &str,
    ) -> TransferOutcome {
        let mut report = TransferReport::default();
        let result = self.execute(items, target_mailbox, target_folder, &mut report);

        // Nothing was written, so there is no audit file to point at
        if report.items_moved == 0 {
            report.audit_location = None;
        }

        match result {
            Ok(Finish::Completed) => {
                let audit = match (&report.audit_location, self.audit.is_some()) {
                    (Some(location), _) => format!("audit log {}", location),
                    (None, true) => "no audit log created, nothing was moved".to_string(),
                    (None, false) => "audit logging disabled".to_string(),
                };
                info!(
                    "Transfer completed: {} items in {} batches ({})",
                    report.items_moved, report.batches_completed, audit
                );
                TransferOutcome::Completed(report)
            }
            Ok(Finish::Aborted) => {
                info!(
                    "Transfer stopped by operator after {} of {} batches",
                    report.batches_completed, report.batches_planned
                );
                TransferOutcome::Aborted(report)
            }
            Err(error) => {
                warn!(
                    "Transfer failed after {} items: {}",
                    report.items_moved, error
                );
                TransferOutcome::Failed { error, report }
            }
        }
    }

    fn execute(
        &mut self,
        items: &[MailItem],
        target_mailbox: &str,
        target_folder: &str,
        report: &mut TransferReport,
    ) -> Result<Finish, TransferError> {
        if self.options.threshold == 0 {
            return Err(TransferError::InvalidThreshold);
        }

        let target = self
            .client
            .bind(target_folder, target_mailbox)
            .map_err(|source| TransferError::TargetFolder {
                folder: target_folder.to_string(),
                mailbox: target_mailbox.to_string(),
                source,
            })?;

        if let Some(audit) = self.audit.as_deref() {
            let location = audit.location();
            if audit.exists() {
                return Err(TransferError::AuditLogExists { location });
            }
            report.audit_location = Some(location);
        }

        let batches = plan(items, self.options.threshold);
        let batch_count = batches.len();
        report.batches_planned = batch_count;

        info!(
            "Moving {} items from {} to '{}' in {} ({} batches)",
            items.len(),
            self.context.source_mailbox,
            target.name,
            target.mailbox,
            batch_count
        );

        for (index, batch) in batches.iter().enumerate() {
            let batch_index = index + 1;
            self.move_batch(batch, batch_index, batch_count, &target, report)?;
            report.batches_completed += 1;

            if batch_index == batch_count {
                break;
            }

            if self.options.check_target_empty {
                self.wait_for_target(&target)?;
            }

            if self.confirm(batch_index + 1, batch_count)? == Decision::Stop {
                return Ok(Finish::Aborted);
            }
        }

        Ok(Finish::Completed)
    }

    fn move_batch(
        &mut self,
        batch: &Batch<'_>,
        batch_index: usize,
        batch_count: usize,
        target: &FolderHandle,
        report: &mut TransferReport,
    ) -> Result<(), TransferError> {
        info!(
            "Starting batch {}/{}: {} items, {} bytes",
            batch_index,
            batch_count,
            batch.len(),
            batch.total_size()
        );
        if let Some(progress) = self.progress.as_deref_mut() {
            progress.batch_started(batch_index, batch_count, batch);
        }

        let batch_len = batch.len();
        for (position, &item) in batch.items().iter().enumerate() {
            let observer = &mut self.progress;
            let retries = move_with_retry(self.client, item, target, self.sleeper, |attempt, wait| {
                if let Some(progress) = observer.as_deref_mut() {
                    progress.throttled(item, attempt, wait);
                }
            })?;
            report.throttle_retries += retries;
            report.items_moved += 1;
            debug!(
                "Moved item {} from {} ({} bytes)",
                item.id,
                item.from.display(),
                item.size
            );

            if let Some(progress) = self.progress.as_deref_mut() {
                progress.item_moved(&ItemProgress {
                    batch_index,
                    batch_count,
                    item,
                    item_index: position + 1,
                    batch_len,
                });
            }

            if let Some(audit) = self.audit.as_deref_mut() {
                let record = TransferRecord::new(
                    item,
                    &self.context.source_mailbox,
                    target,
                    &self.context.acting_user,
                );
                audit.append(&record)?;
            }
        }

        if let Some(progress) = self.progress.as_deref_mut() {
            progress.batch_finished(batch_index, batch_count);
        }
        Ok(())
    }

    fn wait_for_target(&mut self, target: &FolderHandle) -> Result<(), TransferError> {
        let wait = self.options.wait_time;
        let gate = QuotaGate::new(self.client, self.sleeper, wait)
            .with_timeout(self.options.quota_timeout);

        let observer = &mut self.progress;
        gate.wait_until_empty(target, |remaining| {
            if let Some(progress) = observer.as_deref_mut() {
                progress.waiting_for_target(remaining, wait);
            }
        })?;
        Ok(())
    }

    fn confirm(&mut self, next_batch: usize, batch_count: usize) -> Result<Decision, TransferError> {
        if self.options.confirm == ConfirmMode::Automatic {
            return Ok(Decision::Continue);
        }

        let decision = match self.continuation.as_deref_mut() {
            Some(continuation) => continuation.confirm(next_batch, batch_count),
            None => PromptContinuation::stdio().confirm(next_batch, batch_count),
        }
        .map_err(TransferError::Prompt)?;

        if decision == Decision::Stop {
            info!("Operator declined batch {}/{}", next_batch, batch_count);
        }
        Ok(decision)
    }
}
