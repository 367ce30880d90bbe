//! Blocking waits
//!
//! Every wait the engine performs goes through [`Sleeper`] so backoff and
//! quota polling can be observed in tests without real time passing.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Blocks the current thread
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps with `std::thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested waits instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested waits, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sleeper() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(1));
        sleeper.sleep(Duration::from_millis(250));

        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(1), Duration::from_millis(250)]
        );
        assert_eq!(sleeper.total(), Duration::from_millis(1250));
    }

    #[test]
    fn test_thread_sleeper_zero() {
        ThreadSleeper.sleep(Duration::ZERO);
    }
}
