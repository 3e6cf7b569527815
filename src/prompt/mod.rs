//! Interactive prompts.
//!
//! Everything that asks the operator a question goes through the
//! [`Prompter`] trait so command handlers can be driven by a script in tests.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select, Sort};
use thiserror::Error;

/// Errors raised while prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The terminal interaction failed.
    #[error("prompt failed: {0}")]
    Dialog(#[from] dialoguer::Error),
}

/// Result type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Asks the operator to choose or type something.
pub trait Prompter {
    /// Choose one of `items`. `None` means the operator cancelled.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Choose any number of `items`, returned in the order the operator
    /// wants them. Empty means nothing was chosen or the operator cancelled.
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<usize>>;

    /// Read a line of text. `None` means the operator entered nothing.
    fn input(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Theme for all interactive prompts.
pub fn jira_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_style: Style::new().cyan().bold(),
        active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
        active_item_style: Style::new().green(),
        ..ColorfulTheme::default()
    }
}

/// [`Prompter`] backed by the terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Create a prompter using [`jira_theme`].
    pub fn new() -> Self {
        Self {
            theme: jira_theme(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?)
    }

    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<usize>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let chosen = MultiSelect::with_theme(&self.theme)
            .with_prompt(format!("{} (space to toggle, enter to confirm)", prompt))
            .items(items)
            .interact_opt()?
            .unwrap_or_default();
        if chosen.len() < 2 {
            return Ok(chosen);
        }

        let labels: Vec<&String> = chosen.iter().filter_map(|&i| items.get(i)).collect();
        let order = Sort::with_theme(&self.theme)
            .with_prompt("Order your picks (space to grab, arrows to move, enter to confirm)")
            .items(&labels)
            .interact_opt()?;
        Ok(match order {
            Some(order) => order.into_iter().filter_map(|i| chosen.get(i).copied()).collect(),
            None => chosen,
        })
    }

    fn input(&mut self, prompt: &str) -> Result<Option<String>> {
        let text: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}
