//! Mail item model: a single message selected for transfer

use super::FolderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bytes in one megabyte as used by audit records
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Unique identifier for a remote mail item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub email: String,
}

impl EmailAddress {
    /// Create a new email address with just the email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// A mail item as seen by the transfer engine.
///
/// Items are owned by the caller; batches only borrow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailItem {
    /// Remote item ID
    pub id: ItemId,
    /// Size on the server in bytes
    pub size: u64,
    /// Sender address
    pub from: EmailAddress,
    /// Subject line
    pub subject: String,
    /// When the item was received
    pub received_at: DateTime<Utc>,
    /// Folder the item currently lives in
    pub parent_folder_id: FolderId,
}

impl MailItem {
    /// Create a new item builder
    pub fn builder(id: ItemId, parent_folder_id: FolderId) -> MailItemBuilder {
        MailItemBuilder::new(id, parent_folder_id)
    }

    /// Size in megabytes
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }
}

/// Builder for creating MailItem instances
pub struct MailItemBuilder {
    id: ItemId,
    parent_folder_id: FolderId,
    size: u64,
    from: Option<EmailAddress>,
    subject: String,
    received_at: Option<DateTime<Utc>>,
}

impl MailItemBuilder {
    fn new(id: ItemId, parent_folder_id: FolderId) -> Self {
        Self {
            id,
            parent_folder_id,
            size: 0,
            from: None,
            subject: String::new(),
            received_at: None,
        }
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn from(mut self, from: EmailAddress) -> Self {
        self.from = Some(from);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    pub fn build(self) -> MailItem {
        MailItem {
            id: self.id,
            size: self.size,
            from: self
                .from
                .unwrap_or_else(|| EmailAddress::new("unknown@unknown.com")),
            subject: self.subject,
            received_at: self.received_at.unwrap_or_else(Utc::now),
            parent_folder_id: self.parent_folder_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress::with_name("John Doe", "john@example.com");
        assert_eq!(addr.display(), "John Doe <john@example.com>");
    }

    #[test]
    fn test_size_mb() {
        let item = MailItem::builder(ItemId::new("i1"), FolderId::new("f1"))
            .size(3 * 1024 * 1024 / 2)
            .build();
        assert!((item.size_mb() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_defaults() {
        let item = MailItem::builder(ItemId::new("i1"), FolderId::new("f1")).build();
        assert_eq!(item.size, 0);
        assert_eq!(item.from.email, "unknown@unknown.com");
        assert!(item.subject.is_empty());
    }
}
