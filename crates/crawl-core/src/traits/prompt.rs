//! Operator confirmation seam.

use crate::errors::PromptError;

/// Asks the operator a question and returns the raw answer line.
#[allow(async_fn_in_trait)]
pub trait ConfirmationPrompt: Send + Sync {
    async fn ask(&self, prompt_text: &str) -> Result<String, PromptError>;
}

/// Empty input, or input starting with `y`/`Y`, means "keep going".
pub fn is_affirmative(answer: &str) -> bool {
    match answer.trim_end_matches(['\r', '\n']).chars().next() {
        None => true,
        Some(c) => c.eq_ignore_ascii_case(&'y'),
    }
}
