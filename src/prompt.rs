//! Interactive selection of a workflow.

use crate::error::DispatchError;

/// Asks the user to pick one item out of a list.
pub trait Prompt {
    /// Presents `items` under `message` and returns the index of the chosen one.
    ///
    /// Waits for an answer without any timeout.
    fn select(
        &self,
        message: &str,
        items: Vec<String>,
    ) -> impl Future<Output = Result<usize, DispatchError>> + Send;
}

/// A [`Prompt`] rendered in the terminal.
#[cfg(feature = "cli")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[cfg(feature = "cli")]
impl Prompt for TerminalPrompt {
    async fn select(&self, message: &str, items: Vec<String>) -> Result<usize, DispatchError> {
        use dialoguer::{Select, theme::ColorfulTheme};

        let message = message.to_owned();
        let selection = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .items(&items)
                .default(0)
                .max_length(items.len())
                .interact()
        })
        .await??;

        Ok(selection)
    }
}
