//! In-memory audit sink

use super::{AuditError, AuditSink};
use crate::models::TransferRecord;

/// Collects records in a Vec
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Vec<TransferRecord>,
    preexisting: bool,
    /// Appends beyond this many records fail
    capacity: Option<usize>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports its destination as already present
    pub fn preexisting() -> Self {
        Self {
            preexisting: true,
            ..Self::default()
        }
    }

    /// A sink that accepts `records` records and fails every later append
    pub fn fail_after(records: usize) -> Self {
        Self {
            capacity: Some(records),
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }
}

impl AuditSink for MemoryAuditSink {
    fn exists(&self) -> bool {
        self.preexisting
    }

    fn append(&mut self, record: &TransferRecord) -> Result<(), AuditError> {
        if self.capacity.is_some_and(|capacity| self.records.len() >= capacity) {
            return Err(AuditError::Io {
                path: self.location(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FolderHandle, FolderId, ItemId, MailItem};

    fn record(id: &str) -> TransferRecord {
        let item = MailItem::builder(ItemId::new(id), FolderId::new("src")).build();
        let target = FolderHandle::new(FolderId::new("dst"), "Archive", "bob@example.com");
        TransferRecord::new(&item, "alice@example.com", &target, "admin@example.com")
    }

    #[test]
    fn test_fail_after_limit() {
        let mut sink = MemoryAuditSink::fail_after(1);

        sink.append(&record("i1")).unwrap();
        let err = sink.append(&record("i2")).unwrap_err();

        assert!(matches!(err, AuditError::Io { .. }));
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].source_item_id, "i1");
    }
}
