//! Bounded throttle retry
//!
//! Each item is moved through a small state machine:
//! `Attempt(n) -> Moved | Retry(backoff) | Fatal`, with `n` capped at
//! [`MAX_THROTTLE_ATTEMPTS`]. Only throttling is retried; any other failure is
//! fatal on the first attempt.

use log::warn;
use std::time::Duration;

use super::TransferError;
use super::timing::Sleeper;
use crate::models::{FolderHandle, ItemId, MailItem};
use crate::remote::{MoveOutcome, RemoteMailClient};

/// Attempts per item before throttling becomes fatal
pub const MAX_THROTTLE_ATTEMPTS: u32 = 3;

/// Added to the backoff suggested by the service
pub const BACKOFF_MARGIN: Duration = Duration::from_millis(100);

/// What to do after an attempt
#[derive(Debug)]
pub enum Step {
    Moved,
    /// Wait this long, then attempt the same item again
    Retry(Duration),
    Fatal(TransferError),
}

/// Attempt counter for a single item
#[derive(Debug, Clone)]
pub struct ThrottleRetry {
    attempts: u32,
    limit: u32,
}

impl Default for ThrottleRetry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThrottleRetry {
    pub fn new() -> Self {
        Self::with_limit(MAX_THROTTLE_ATTEMPTS)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            attempts: 0,
            limit: limit.max(1),
        }
    }

    /// Attempts recorded so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record the outcome of one attempt and decide the next step
    pub fn record(&mut self, item: &ItemId, outcome: MoveOutcome) -> Step {
        self.attempts += 1;

        match outcome {
            MoveOutcome::Moved => Step::Moved,
            MoveOutcome::Throttled { .. } if self.attempts >= self.limit => {
                Step::Fatal(TransferError::ThrottleExhausted {
                    item: item.clone(),
                    attempts: self.attempts,
                })
            }
            MoveOutcome::Throttled { backoff } => Step::Retry(backoff + BACKOFF_MARGIN),
            MoveOutcome::Failed { cause } => Step::Fatal(TransferError::Move {
                item: item.clone(),
                cause,
            }),
        }
    }
}

/// Move one item, sleeping through throttling.
///
/// `on_retry` is called with the attempt number and the wait before each
/// sleep. Returns the number of retries the item needed.
pub fn move_with_retry(
    client: &dyn RemoteMailClient,
    item: &MailItem,
    destination: &FolderHandle,
    sleeper: &dyn Sleeper,
    mut on_retry: impl FnMut(u32, Duration),
) -> Result<u32, TransferError> {
    let mut retry = ThrottleRetry::new();

    loop {
        let outcome = client.move_item(item, destination);
        match retry.record(&item.id, outcome) {
            Step::Moved => return Ok(retry.attempts() - 1),
            Step::Retry(wait) => {
                warn!(
                    "Move of item {} throttled (attempt {}), retrying in {:?}",
                    item.id,
                    retry.attempts(),
                    wait
                );
                on_retry(retry.attempts(), wait);
                sleeper.sleep(wait);
            }
            Step::Fatal(err) => return Err(err),
        }
    }
}
