//! Progress notifications
//!
//! Observational only: observers cannot influence the run.

use std::time::Duration;

use crate::batch::Batch;
use crate::models::MailItem;

/// Progress after an item was moved
#[derive(Debug, Clone, Copy)]
pub struct ItemProgress<'a> {
    /// 1-based batch index
    pub batch_index: usize,
    pub batch_count: usize,
    pub item: &'a MailItem,
    /// 1-based position of the item within its batch
    pub item_index: usize,
    pub batch_len: usize,
}

impl ItemProgress<'_> {
    /// Percent of the current batch completed
    pub fn percent(&self) -> f64 {
        if self.batch_len == 0 {
            return 100.0;
        }
        self.item_index as f64 * 100.0 / self.batch_len as f64
    }
}

/// Receives transfer events
pub trait ProgressObserver {
    fn batch_started(&mut self, _batch_index: usize, _batch_count: usize, _batch: &Batch<'_>) {}

    fn item_moved(&mut self, progress: &ItemProgress<'_>);

    fn throttled(&mut self, _item: &MailItem, _attempt: u32, _wait: Duration) {}

    fn waiting_for_target(&mut self, _remaining: u64, _wait: Duration) {}

    fn batch_finished(&mut self, _batch_index: usize, _batch_count: usize) {}
}
