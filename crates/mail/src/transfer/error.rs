//! Transfer error taxonomy

use std::time::Duration;

use crate::audit::AuditError;
use crate::models::ItemId;
use crate::remote::BindError;

/// Fatal condition that ends a transfer run
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("batch size threshold must be greater than zero")]
    InvalidThreshold,

    #[error("cannot use target folder '{folder}' in mailbox {mailbox}")]
    TargetFolder {
        folder: String,
        mailbox: String,
        #[source]
        source: BindError,
    },

    #[error("audit log {location} already exists, refusing to append to it")]
    AuditLogExists { location: String },

    #[error("item {item} was still throttled after {attempts} attempts")]
    ThrottleExhausted { item: ItemId, attempts: u32 },

    #[error("failed to move item {item}: {cause}")]
    Move { item: ItemId, cause: String },

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("failed to query item count of folder '{folder}'")]
    ItemCount {
        folder: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("target folder '{folder}' still holds {remaining} items after waiting {waited:?}")]
    QuotaTimeout {
        folder: String,
        remaining: u64,
        waited: Duration,
    },

    #[error("failed to read confirmation")]
    Prompt(#[source] std::io::Error),
}

impl TransferError {
    /// Whether the error was raised by pre-flight checks, before any item moved
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidThreshold | Self::TargetFolder { .. } | Self::AuditLogExists { .. }
        )
    }
}
