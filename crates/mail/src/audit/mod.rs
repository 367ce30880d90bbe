//! Audit trail for moved items
//!
//! One [`TransferRecord`](crate::models::TransferRecord) is appended per
//! successfully moved item, in move order.

mod file;
mod memory;
mod traits;

pub use file::{DEFAULT_DELIMITER, DelimitedFileSink};
pub use memory::MemoryAuditSink;
pub use traits::{AuditError, AuditSink};
