//! Quota gate: wait for the destination folder to drain

use log::{debug, info};
use std::time::Duration;

use super::TransferError;
use super::timing::Sleeper;
use crate::models::FolderHandle;
use crate::remote::RemoteMailClient;

/// Blocks until a folder's item count reaches zero.
///
/// Polls every `wait` with no upper bound unless a timeout is set.
pub struct QuotaGate<'a> {
    client: &'a dyn RemoteMailClient,
    sleeper: &'a dyn Sleeper,
    wait: Duration,
    timeout: Option<Duration>,
}

impl<'a> QuotaGate<'a> {
    pub fn new(client: &'a dyn RemoteMailClient, sleeper: &'a dyn Sleeper, wait: Duration) -> Self {
        Self {
            client,
            sleeper,
            wait,
            timeout: None,
        }
    }

    /// Give up once the accumulated wait would exceed `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait until `folder` is empty.
    ///
    /// `on_wait` receives the remaining item count before each sleep. Returns
    /// the number of waits performed.
    pub fn wait_until_empty(
        &self,
        folder: &FolderHandle,
        mut on_wait: impl FnMut(u64),
    ) -> Result<u32, TransferError> {
        let mut waits = 0u32;
        let mut waited = Duration::ZERO;

        loop {
            let remaining = self
                .client
                .item_count(folder)
                .map_err(|source| TransferError::ItemCount {
                    folder: folder.name.clone(),
                    source,
                })?;

            if remaining == 0 {
                debug!("Target folder '{}' is empty after {} waits", folder.name, waits);
                return Ok(waits);
            }

            if let Some(timeout) = self.timeout
                && waited + self.wait > timeout
            {
                return Err(TransferError::QuotaTimeout {
                    folder: folder.name.clone(),
                    remaining,
                    waited,
                });
            }

            info!(
                "Target folder '{}' still holds {} items, waiting {:?}",
                folder.name, remaining, self.wait
            );
            on_wait(remaining);
            self.sleeper.sleep(self.wait);
            waits += 1;
            waited += self.wait;
        }
    }
}
