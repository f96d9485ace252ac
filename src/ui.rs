use crate::constants::{MAX_LINE_LENGTH, SPINNER_TICK_MILLIS};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

#[macro_export]
macro_rules! warning {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).yellow());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).yellow());
    }};
}

#[macro_export]
macro_rules! error {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).red());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!("{}", $expr).red());
    }};
}

#[macro_export]
macro_rules! status {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).green());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!("{}", $expr).green());
    }};
}

#[macro_export]
macro_rules! notice {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).yellow());
    }};
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    // format string literal (with or without inline formatting or args)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $fmt $(, $($arg)*)?);
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", $expr);
    }};
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"];

/// apply the `color_enabled` setting; when enabled, colored's own tty and
/// NO_COLOR detection still applies
pub fn set_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// progress indicator for a blocking operation
///
/// animates on a background ticker while stdout is a terminal, otherwise
/// prints the message once. the ticker is stopped by `finish` or on drop.
pub struct Spinner {
    bar: Option<ProgressBar>,
    plain: Option<Box<dyn Write>>,
    message: String,
    finished: bool,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        if !io::stdout().is_terminal() {
            return Self::plain(message, Box::new(io::stdout()));
        }

        let style = ProgressStyle::with_template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_FRAMES);
        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MILLIS));

        Self {
            bar: Some(bar),
            plain: None,
            message: message.to_string(),
            finished: false,
        }
    }

    /// static progress line written to `out`
    fn plain(message: &str, mut out: Box<dyn Write>) -> Self {
        let _ = write!(out, "{message} ");
        let _ = out.flush();

        Self {
            bar: None,
            plain: Some(out),
            message: message.to_string(),
            finished: false,
        }
    }

    /// stop the ticker and report completion
    pub fn finish(mut self) {
        self.finished = true;
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            info!("{} Done!", self.message);
        } else if let Some(out) = self.plain.as_mut() {
            let _ = writeln!(out, "Done!");
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        } else if let Some(out) = self.plain.as_mut() {
            let _ = writeln!(out);
        }
    }
}

/// print the generated message, highlighting anything past the line limit
pub fn display_message(message: &str) {
    let _ = write_message(&mut io::stdout(), message);

    if let Some(header_len) = header_overflow(message) {
        warning!(
            "header is {} characters, longer than {}",
            header_len,
            MAX_LINE_LENGTH
        );
    }
}

fn write_message(out: &mut impl Write, message: &str) -> io::Result<()> {
    use colored::Colorize;

    writeln!(out)?;
    writeln!(out, "{}", "=== Generated Commit Message ===".blue())?;
    for line in message.lines() {
        match line.char_indices().nth(MAX_LINE_LENGTH) {
            Some((split, _)) => {
                let (first_part, rest) = line.split_at(split);
                writeln!(out, "{}{}", first_part.green(), rest.red())?;
            }
            None => writeln!(out, "{}", line.green())?,
        }
    }
    writeln!(out)
}

/// header length in chars, when it is over the limit
fn header_overflow(message: &str) -> Option<usize> {
    let header_len = message.lines().next().map_or(0, |line| line.chars().count());
    (header_len > MAX_LINE_LENGTH).then_some(header_len)
}

/// print the accept/edit/cancel menu
pub fn display_choices() {
    use colored::Colorize;

    info!("{}", "What would you like to do?".cyan());
    info!("{}Commit with this message", "[Y]es: ".green());
    info!("{}Edit the message", "[E]dit: ".yellow());
    info!("{}Cancel commit", "[N]o: ".red());
}

/// line input from the terminal, set up on first use
#[derive(Default)]
pub struct TerminalInput {
    editor: Option<DefaultEditor>,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// read one line; `None` when the user interrupts or closes input
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let editor = match self.editor.take() {
            Some(editor) => editor,
            None => DefaultEditor::new().context("failed to initialise line editor")?,
        };
        let editor = self.editor.insert(editor);

        match editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                info!("^C");
                Ok(None)
            }
            Err(e) => Err(e).context("failed to read input"),
        }
    }
}
