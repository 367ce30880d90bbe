//! Mail crate - Business logic for batched mail transfers
//!
//! This crate provides:
//! - Domain models (MailItem, FolderHandle, TransferRecord)
//! - Size-bounded batch planning
//! - Remote mail client abstraction with a Microsoft Graph implementation
//! - Transfer orchestration with throttle retry, quota gate and operator confirmation
//! - Audit sinks for per-item transfer records
//!
//! This crate has zero UI dependencies; the CLI supplies progress and prompts
//! through the observer and continuation traits.

pub mod audit;
pub mod batch;
pub mod config;
pub mod graph;
pub mod models;
pub mod remote;
pub mod transfer;

pub use audit::{AuditError, AuditSink, DEFAULT_DELIMITER, DelimitedFileSink, MemoryAuditSink};
pub use batch::{Batch, BatchSet, partition, plan};
pub use config::{GraphCredentials, TransferSettings};
pub use graph::{GraphClient, GraphSession};
pub use models::{
    EmailAddress, FolderHandle, FolderId, FolderSummary, ItemId, MailItem, RECORD_COLUMNS,
    TransferRecord,
};
pub use remote::{BindError, InMemoryMailClient, MoveOutcome, RemoteMailClient};
pub use transfer::{
    // Orchestration
    TransferContext, TransferOptions, TransferOrchestrator, TransferOutcome, TransferReport,
    TransferError, DEFAULT_BATCH_THRESHOLD, DEFAULT_WAIT_TIME,
    // Operator interaction
    ConfirmMode, Continuation, Decision, PromptContinuation, ItemProgress, ProgressObserver,
    // Waiting
    Sleeper, ThreadSleeper,
};
