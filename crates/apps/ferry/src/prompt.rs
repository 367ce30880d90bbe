//! Operator confirmation between batches

use std::io;

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use mail::transfer::{ANSWER_CONTINUE, ANSWER_STOP, parse_answer};
use mail::{Continuation, Decision};

/// Asks on the terminal before each batch after the first
#[derive(Default)]
pub struct DialoguerPrompt {
    theme: ColorfulTheme,
}

impl DialoguerPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Continuation for DialoguerPrompt {
    fn confirm(&mut self, next_batch: usize, batch_count: usize) -> io::Result<Decision> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(format!(
                "Continue with batch {} of {}? [{}/{}]",
                next_batch, batch_count, ANSWER_CONTINUE, ANSWER_STOP
            ))
            .validate_with(|input: &String| -> Result<(), String> {
                match parse_answer(input) {
                    Some(_) => Ok(()),
                    None => Err(format!("Please answer {} or {}.", ANSWER_CONTINUE, ANSWER_STOP)),
                }
            })
            .interact_text()
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Interrupted,
                    format!("failed to read answer: {e}"),
                )
            })?;

        parse_answer(&answer).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("unexpected answer {answer:?}"))
        })
    }
}
