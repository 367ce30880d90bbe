//! Transfer engine
//!
//! Moves an ordered list of items into a target folder in size-bounded
//! batches. Execution is strictly sequential: one item at a time, one batch
//! at a time. The only waits are throttle backoff, the quota gate and the
//! operator prompt.

mod confirm;
mod error;
mod orchestrator;
mod progress;
mod quota;
mod retry;
mod timing;

pub use confirm::{
    ANSWER_CONTINUE, ANSWER_STOP, AutoContinue, ConfirmMode, Continuation, Decision,
    PromptContinuation, parse_answer,
};
pub use error::TransferError;
pub use orchestrator::{
    DEFAULT_BATCH_THRESHOLD, DEFAULT_WAIT_TIME, TransferContext, TransferOptions,
    TransferOrchestrator, TransferOutcome, TransferReport,
};
pub use progress::{ItemProgress, ProgressObserver};
pub use quota::QuotaGate;
pub use retry::{BACKOFF_MARGIN, MAX_THROTTLE_ATTEMPTS, Step, ThrottleRetry, move_with_retry};
pub use timing::{RecordingSleeper, Sleeper, ThreadSleeper};
