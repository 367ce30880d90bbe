//! Continuation at batch boundaries

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// How the run proceeds between batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmMode {
    /// Always continue
    Automatic,
    /// Ask the operator before every batch after the first
    #[default]
    Interactive,
}

/// Operator decision at a batch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop,
}

/// Asked before starting the next batch
pub trait Continuation {
    /// `next_batch` is 1-based
    fn confirm(&mut self, next_batch: usize, batch_count: usize) -> io::Result<Decision>;
}

/// Continues without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoContinue;

impl Continuation for AutoContinue {
    fn confirm(&mut self, _next_batch: usize, _batch_count: usize) -> io::Result<Decision> {
        Ok(Decision::Continue)
    }
}

/// Accepted answer for continuing
pub const ANSWER_CONTINUE: &str = "Y";
/// Accepted answer for stopping
pub const ANSWER_STOP: &str = "N";

/// Interpret a prompt answer. Only exact, case-sensitive `Y` and `N` count.
pub fn parse_answer(answer: &str) -> Option<Decision> {
    match answer.trim_end_matches(['\r', '\n']) {
        ANSWER_CONTINUE => Some(Decision::Continue),
        ANSWER_STOP => Some(Decision::Stop),
        _ => None,
    }
}

/// Line-based prompt over any reader/writer pair.
///
/// Re-asks until the answer is exactly `Y` or `N`. End of input is an error.
pub struct PromptContinuation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptContinuation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl PromptContinuation<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Continuation for PromptContinuation<R, W> {
    fn confirm(&mut self, next_batch: usize, batch_count: usize) -> io::Result<Decision> {
        loop {
            write!(
                self.output,
                "Continue with batch {next_batch} of {batch_count}? [{ANSWER_CONTINUE}/{ANSWER_STOP}] "
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no answer before end of input",
                ));
            }

            if let Some(decision) = parse_answer(&line) {
                return Ok(decision);
            }
            writeln!(self.output, "Please answer {ANSWER_CONTINUE} or {ANSWER_STOP}.")?;
        }
    }
}
