use clap::{Parser, Subcommand};

const AFTER_HELP: &str = "\
Configuration:
  Config file location: ~/.ai-commit/config.yaml
  Environment variables:
    API_KEY    API key for the AI service
    VISUAL     Preferred editor for the edit option
    EDITOR     Editor used when VISUAL is not set
    RUST_LOG   Diagnostic log filter (e.g. debug)

Examples:
  1. Initialise configuration:
     ai-commit init

  2. Stage your changes:
     git add .

  3. Generate commit message:
     ai-commit

Tips:
  - Make atomic commits (one logical change per commit)
  - Stage only related changes together
  - Review the generated message before confirming
  - Use the config file to customise templates and settings";

/// ai-commit: generate commit messages for staged changes
#[derive(Parser, Debug)]
#[command(
    name = "ai-commit",
    about,
    long_about = None,
    disable_version_flag = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// show version information
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// print the prompt sent to the model
    #[arg(long)]
    pub debug_prompt: bool,

    /// print the raw response body from the model
    #[arg(long)]
    pub debug_response: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// initialise or update configuration
    Init,

    /// show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands_and_flags() {
        let cli = Cli::try_parse_from(["ai-commit"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.version);

        let cli = Cli::try_parse_from(["ai-commit", "init"]).unwrap();
        assert_eq!(cli.command, Some(Command::Init));

        let cli = Cli::try_parse_from(["ai-commit", "version"]).unwrap();
        assert_eq!(cli.command, Some(Command::Version));

        for flag in ["-v", "--version"] {
            let cli = Cli::try_parse_from(["ai-commit", flag]).unwrap();
            assert!(cli.version);
        }

        let cli = Cli::try_parse_from(["ai-commit", "--debug-prompt", "--debug-response"]).unwrap();
        assert!(cli.debug_prompt);
        assert!(cli.debug_response);
    }

    #[test]
    fn test_help_variants_are_recognised() {
        for args in [
            vec!["ai-commit", "-h"],
            vec!["ai-commit", "--help"],
            vec!["ai-commit", "help"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["ai-commit", "push"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
