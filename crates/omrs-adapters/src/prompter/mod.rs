//! Prompter adapters: line-oriented streams and pre-supplied answers.

mod batch;
mod stdio;

pub use batch::BatchPrompter;
pub use stdio::StdioPrompter;
