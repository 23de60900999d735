//! Terminal interaction for the setup wizard

use crate::setup::SetupError;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Highlight,
    Success,
    Example,
}

/// Questions and announcements the wizard needs from a terminal.
pub trait Prompter {
    /// Asks for a line of text. With `required`, empty answers are rejected.
    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        required: bool,
    ) -> Result<String, SetupError>;

    /// Asks for any number of `items`; returns the chosen indices.
    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, SetupError>;

    fn say(&mut self, tone: Tone, message: &str);
}

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        required: bool,
    ) -> Result<String, SetupError> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);

        if let Some(default) = default {
            input = input.default(default.to_owned());
        }

        input = if required {
            input.validate_with(|value: &String| -> Result<(), &str> {
                if value.trim().is_empty() {
                    Err("a value is required")
                } else {
                    Ok(())
                }
            })
        } else {
            input.allow_empty(true)
        };

        Ok(input.interact_text()?)
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, SetupError> {
        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact()?;

        Ok(selection)
    }

    fn say(&mut self, tone: Tone, message: &str) {
        let styled = match tone {
            Tone::Plain => style(message),
            Tone::Highlight => style(message).magenta(),
            Tone::Success => style(message).green(),
            Tone::Example => style(message).cyan(),
        };
        println!("{styled}");
    }
}
