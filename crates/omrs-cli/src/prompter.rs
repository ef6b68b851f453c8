//! Prompter selection.
//!
//! `--batch-answers` always wins.  Otherwise questions go to the terminal:
//! through `dialoguer` when the `interactive` feature is on, or plain
//! line-reading on stdin when it is off.

use console::Term;
use omrs_adapters::BatchPrompter;
use omrs_core::{application::ports::Prompter, error::SdkResult};
use tracing::{debug, info, warn};

use crate::cli::{GlobalArgs, OutputFormat};

/// The prompter every service in this run shares.
///
/// Informational lines go to stdout, except in quiet or JSON runs where
/// they are only logged.
pub fn select(global: &GlobalArgs) -> Box<dyn Prompter> {
    let echo = !global.quiet && global.output_format != OutputFormat::Json;
    let inner: Box<dyn Prompter> = match global.batch_answers.as_deref() {
        Some(answers) => {
            debug!("Using batch answers");
            Box::new(BatchPrompter::from_list(answers))
        }
        None => terminal(),
    };
    Box::new(Shown { inner, echo })
}

struct Shown {
    inner: Box<dyn Prompter>,
    echo: bool,
}

impl Prompter for Shown {
    fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String> {
        self.inner.ask(prompt, default)
    }

    fn show(&self, message: &str) {
        if !self.echo {
            info!("{message}");
            return;
        }
        if let Err(e) = Term::stdout().write_line(message) {
            warn!(error = %e, "Could not write to the terminal");
        }
    }
}

#[cfg(feature = "interactive")]
fn terminal() -> Box<dyn Prompter> {
    Box::new(dialog::DialoguerPrompter::default())
}

#[cfg(not(feature = "interactive"))]
fn terminal() -> Box<dyn Prompter> {
    Box::new(omrs_adapters::StdioPrompter::stdio())
}

#[cfg(feature = "interactive")]
mod dialog {
    use dialoguer::{Input, theme::ColorfulTheme};
    use omrs_core::{
        application::{ApplicationError, ports::Prompter},
        error::SdkResult,
    };

    /// Terminal prompts rendered by `dialoguer`.
    #[derive(Default)]
    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
    }

    impl Prompter for DialoguerPrompter {
        fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String> {
            let mut input = Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true);
            if let Some(d) = default.filter(|d| !d.is_empty()) {
                input = input.default(d.to_string()).show_default(true);
            }

            let answer = input
                .interact_text()
                .map_err(|e| ApplicationError::PromptFailed {
                    reason: e.to_string(),
                })?;
            let answer = answer.trim();

            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            match default {
                Some(d) => Ok(d.to_string()),
                None => Err(ApplicationError::MissingAnswer {
                    prompt: prompt.to_string(),
                }
                .into()),
            }
        }

        // Display is handled by the `Shown` wrapper.
        fn show(&self, _message: &str) {}
    }
}
