use std::collections::VecDeque;
use std::sync::Mutex;

use omrs_core::{
    application::{ApplicationError, ports::Prompter},
    error::SdkResult,
};
use tracing::{debug, info};

/// Answers questions from a queue supplied up front.
///
/// A blank answer selects the default. Once the queue is empty every
/// question takes its default. A blank or missing answer to a question
/// without one fails with [`ApplicationError::MissingAnswer`].
#[derive(Debug, Default)]
pub struct BatchPrompter {
    answers: Mutex<VecDeque<String>>,
}

impl BatchPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    /// Answers from a comma-separated list, e.g. `--batch-answers "demo,1,2,y"`.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl Prompter for BatchPrompter {
    fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String> {
        let next = self
            .answers
            .lock()
            .map_err(|e| ApplicationError::PromptFailed {
                reason: e.to_string(),
            })?
            .pop_front();

        let answer = match (next.filter(|a| !a.trim().is_empty()), default) {
            (Some(a), _) => a,
            (None, Some(d)) => d.to_string(),
            (None, None) => {
                return Err(ApplicationError::MissingAnswer {
                    prompt: prompt.to_string(),
                }
                .into());
            }
        };
        debug!(%prompt, %answer, "Batch answer");
        Ok(answer)
    }

    fn show(&self, message: &str) {
        info!("{message}");
    }
}
