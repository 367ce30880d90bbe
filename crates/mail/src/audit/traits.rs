//! Audit sink trait definitions

use crate::models::TransferRecord;

/// Error writing the audit trail
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit log {path} already exists")]
    AlreadyExists { path: String },
    #[error("failed to write audit log {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for audit records
pub trait AuditSink {
    /// Whether the destination already holds data; checked once before a run
    fn exists(&self) -> bool;

    /// Append one record
    fn append(&mut self, record: &TransferRecord) -> Result<(), AuditError>;

    /// Human-readable location reported to the operator
    fn location(&self) -> String;
}
