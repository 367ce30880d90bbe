//! Remote mail client trait definitions

use anyhow::Result;
use std::time::Duration;

use crate::models::{FolderHandle, MailItem};

/// Result of a single move attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The service accepted the move
    Moved,
    /// The service asked the caller to retry after `backoff`
    Throttled { backoff: Duration },
    /// Any other failure; not retryable
    Failed { cause: String },
}

impl MoveOutcome {
    pub fn throttled(backoff: Duration) -> Self {
        Self::Throttled { backoff }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self::Failed {
            cause: cause.into(),
        }
    }
}

/// Error binding a folder by name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("folder '{folder}' not found in mailbox {mailbox}")]
    NotFound { folder: String, mailbox: String },
    #[error("access to folder '{folder}' in mailbox {mailbox} denied")]
    AccessDenied { folder: String, mailbox: String },
    #[error("folder '{folder}' is in mailbox {mailbox}; items can only be moved within {session_mailbox}")]
    OtherMailbox {
        folder: String,
        mailbox: String,
        session_mailbox: String,
    },
    #[error("failed to bind folder: {0}")]
    Remote(String),
}

/// Capability the transfer engine needs from the remote mail service.
///
/// Calls are issued strictly one at a time; implementations must tolerate
/// bind, move and count requests in rapid succession.
pub trait RemoteMailClient {
    /// Resolve a folder by display name within a mailbox
    fn bind(&self, folder_name: &str, mailbox: &str) -> Result<FolderHandle, BindError>;

    /// Move one item into the destination folder
    fn move_item(&self, item: &MailItem, destination: &FolderHandle) -> MoveOutcome;

    /// Current number of items in a folder
    fn item_count(&self, folder: &FolderHandle) -> Result<u64>;
}
