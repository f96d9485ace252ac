mod cli;
mod config;
mod constants;
mod context;
mod editor;
mod error;
mod generator;
mod git;
mod prompt;
mod retry;
mod review;
mod ui;
mod workflow;

use crate::cli::{Cli, Command};
use crate::config::{Config, ConfigStore, env_api_key};
use crate::context::AppContext;
use crate::error::{ConfigError, GitError};
use crate::generator::{GeminiClient, Generator};
use crate::git::Git;
use crate::review::ExternalEditor;
use crate::ui::TerminalInput;
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    if cli.version || cli.command == Some(Command::Version) {
        info!("ai-commit version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match cli.command {
        Some(Command::Init) => init_config(),
        _ => run(&cli),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let store = ConfigStore::locate()?;
    let config = store
        .load(env_api_key())
        .context("failed to load config")?;
    ui::set_color(config.color_enabled);

    let git = Git::open(Path::new("."));
    let client = GeminiClient::new(&config, cli.debug_response);
    let generator =
        Generator::new(client, config.templates.clone()).with_show_prompt(cli.debug_prompt);
    let ctx = AppContext::new(config, git, generator);

    let mut input = TerminalInput::new();
    let editor = ExternalEditor::new(&ctx.git);
    workflow::commit_staged(&ctx, &mut input, &editor)?;

    Ok(())
}

/// prompt for the api key and write the config, keeping any other settings
fn init_config() -> Result<()> {
    let store = ConfigStore::locate()?;
    let mut config = match store.load_unvalidated(None) {
        Ok(config) => config,
        Err(e @ ConfigError::Parse { .. }) => {
            warning!(
                "{:#}; starting from default settings",
                anyhow::Error::new(e)
            );
            Config::defaults(None)
        }
        Err(e) => return Err(e.into()),
    };
    ui::set_color(config.color_enabled);

    let mut input = TerminalInput::new();
    let Some(answer) = input.read_line(
        "Enter your API key (or press Enter to use API_KEY environment variable): ",
    )?
    else {
        notice!("Initialisation cancelled");
        return Ok(());
    };

    let api_key = answer.trim();
    if !api_key.is_empty() {
        config.api_key = api_key.to_string();
    }
    store.save(&config)?;

    status!("Configuration initialized successfully!");
    info!("Edit {} to customize settings", store.path().display());
    if config.api_key.is_empty() && env_api_key().is_none() {
        warning!("no API key stored; set the API_KEY environment variable before running");
    }
    Ok(())
}

/// print an error, with a tip for the errors users can fix themselves
fn report_error(err: &anyhow::Error) {
    use colored::Colorize;

    let known = if let Some(GitError::NotARepository) = err.downcast_ref::<GitError>() {
        Some((
            "Not a git repository",
            "Initialize a git repository with 'git init'",
        ))
    } else if let Some(GitError::NoStagedChanges) = err.downcast_ref::<GitError>() {
        Some((
            "No staged changes found",
            "Stage your changes with 'git add <files>' first",
        ))
    } else if let Some(ConfigError::MissingApiKey) = err.downcast_ref::<ConfigError>() {
        Some((
            "API key is missing",
            "Run 'ai-commit init' to set up configuration or set API_KEY environment variable",
        ))
    } else {
        None
    };

    match known {
        Some((headline, tip)) => {
            info!("{}", format!("Error: {headline}").red());
            info!("Tip: {}", tip);
        }
        None => info!("{}", format!("Error: {err:#}").red()),
    }
}
