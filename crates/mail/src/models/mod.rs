//! Domain models for transfer entities

mod folder;
mod item;
mod record;

pub use folder::{FolderHandle, FolderId, FolderSummary};
pub use item::{EmailAddress, ItemId, MailItem, MailItemBuilder};
pub use record::{RECORD_COLUMNS, TransferRecord};
