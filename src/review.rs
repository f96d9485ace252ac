use crate::editor::{edit_in, find_editor};
use crate::error::EditError;
use crate::git::{Git, GitRunner};
use crate::ui::{self, TerminalInput};
use anyhow::{Context, Result};

const CHOICE_PROMPT: &str = "Choice [Y/e/n]: ";

/// source of the user's answer to the accept/edit/cancel prompt
pub trait ChoiceReader {
    /// `None` means input ended or was interrupted
    fn read_choice(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl ChoiceReader for TerminalInput {
    fn read_choice(&mut self, prompt: &str) -> Result<Option<String>> {
        use colored::Colorize;
        self.read_line(&prompt.cyan().to_string())
    }
}

/// lets the user rewrite the message
pub trait MessageEditor {
    fn edit(&self, message: &str) -> Result<String, EditError>;
}

/// the user's text editor, resolved from the environment and git config
pub struct ExternalEditor<'a, R> {
    git: &'a Git<R>,
}

impl<'a, R: GitRunner> ExternalEditor<'a, R> {
    pub fn new(git: &'a Git<R>) -> Self {
        Self { git }
    }
}

impl<R: GitRunner> MessageEditor for ExternalEditor<'_, R> {
    fn edit(&self, message: &str) -> Result<String, EditError> {
        let editor = find_editor(self.git.configured_editor()).ok_or(EditError::NoEditor)?;
        edit_in(&editor, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Edit,
    Cancel,
}

/// interpret a line of input; empty input accepts
pub fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(Choice::Accept),
        "e" | "edit" => Some(Choice::Edit),
        "n" | "no" => Some(Choice::Cancel),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Accepted(String),
    Cancelled,
}

/// present `message` until the user accepts or cancels it
///
/// editing replaces the message and presents it again; an editor failure
/// (including an empty result) ends the review with an error
pub fn review(
    message: String,
    input: &mut impl ChoiceReader,
    editor: &impl MessageEditor,
) -> Result<Outcome> {
    let mut message = message;
    loop {
        ui::display_message(&message);
        ui::display_choices();

        let Some(line) = input.read_choice(CHOICE_PROMPT)? else {
            return Ok(Outcome::Cancelled);
        };

        match parse_choice(&line) {
            Some(Choice::Accept) => return Ok(Outcome::Accepted(message)),
            Some(Choice::Cancel) => return Ok(Outcome::Cancelled),
            Some(Choice::Edit) => {
                message = editor
                    .edit(&message)
                    .context("failed to edit commit message")?;
            }
            None => crate::error!("Invalid choice. Please try again."),
        }
    }
}
