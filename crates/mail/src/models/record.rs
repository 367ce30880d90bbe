//! Audit record for a transferred item

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{FolderHandle, MailItem};

/// Column names of an audit record, in output order
pub const RECORD_COLUMNS: [&str; 11] = [
    "SourceMailbox",
    "SourceFolderId",
    "TargetMailbox",
    "TargetFolderName",
    "TargetFolderId",
    "SourceItemId",
    "Sender",
    "Subject",
    "Received",
    "SizeMB",
    "ActingUser",
];

/// One audit entry per successfully moved item.
///
/// Only created after the remote service confirmed the move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub source_mailbox: String,
    pub source_folder_id: String,
    pub target_mailbox: String,
    pub target_folder_name: String,
    pub target_folder_id: String,
    pub source_item_id: String,
    pub sender: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
    pub size_mb: f64,
    pub acting_user: String,
}

impl TransferRecord {
    pub fn new(
        item: &MailItem,
        source_mailbox: &str,
        target: &FolderHandle,
        acting_user: &str,
    ) -> Self {
        Self {
            source_mailbox: source_mailbox.to_string(),
            source_folder_id: item.parent_folder_id.as_str().to_string(),
            target_mailbox: target.mailbox.clone(),
            target_folder_name: target.name.clone(),
            target_folder_id: target.id.as_str().to_string(),
            source_item_id: item.id.as_str().to_string(),
            sender: item.from.email.clone(),
            subject: item.subject.clone(),
            received_at: item.received_at,
            size_mb: item.size_mb(),
            acting_user: acting_user.to_string(),
        }
    }

    /// Field values in [`RECORD_COLUMNS`] order, size rounded to 2 decimals
    pub fn fields(&self) -> [String; 11] {
        [
            self.source_mailbox.clone(),
            self.source_folder_id.clone(),
            self.target_mailbox.clone(),
            self.target_folder_name.clone(),
            self.target_folder_id.clone(),
            self.source_item_id.clone(),
            self.sender.clone(),
            self.subject.clone(),
            self.received_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.2}", self.size_mb),
            self.acting_user.clone(),
        ]
    }
}
