//! Folder references on the remote service

use serde::{Deserialize, Serialize};

/// Unique identifier for a remote folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A folder bound within a mailbox.
///
/// Obtained from [`crate::remote::RemoteMailClient::bind`] and used as the
/// destination of moves and the subject of item-count queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub id: FolderId,
    /// Display name the folder was bound by
    pub name: String,
    /// Mailbox (user principal name or SMTP address) owning the folder
    pub mailbox: String,
}

impl FolderHandle {
    pub fn new(id: FolderId, name: impl Into<String>, mailbox: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mailbox: mailbox.into(),
        }
    }
}

/// Folder listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub id: FolderId,
    pub name: String,
    pub total_item_count: u64,
    pub child_folder_count: u64,
}
