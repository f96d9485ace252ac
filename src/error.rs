use num_format::{Locale, ToFormattedString};
use thiserror::Error;

fn group_digits(n: &usize) -> String {
    n.to_formatted_string(&Locale::en)
}

/// errors from loading, validating or saving the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to locate home directory")]
    NoHomeDir,

    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config file {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise config")]
    Serialize(#[source] serde_yaml::Error),

    #[error("API key is required. Set it in config file or API_KEY environment variable")]
    MissingApiKey,

    #[error("max_diff_size must be positive (got {0})")]
    InvalidMaxDiffSize(i64),

    #[error("history_depth must be positive (got {0})")]
    InvalidHistoryDepth(i64),

    #[error("invalid template prefix: {0:?}")]
    InvalidTemplatePrefix(String),

    #[error("invalid template description for prefix {0}")]
    InvalidTemplateDescription(String),
}

/// errors from git subprocess calls
#[derive(Error, Debug)]
pub enum GitError {
    #[error("not a git repository")]
    NotARepository,

    #[error("no staged changes")]
    NoStagedChanges,

    #[error(
        "diff size of {} bytes exceeds maximum allowed size of {} bytes",
        group_digits(.size),
        group_digits(.max)
    )]
    DiffTooLarge { size: usize, max: usize },

    #[error("failed to run git")]
    Spawn(#[source] std::io::Error),

    #[error("git {command} failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("failed to commit: {0}")]
    CommitFailed(String),
}

/// errors from the remote text-generation call
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("request failed")]
    Transport(#[from] ureq::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("empty response received")]
    EmptyResponse,

    #[error("failed after {retries} retries")]
    RetriesExhausted {
        retries: u32,
        #[source]
        source: Box<GenerateError>,
    },
}

/// errors from editing the message in an external editor
#[derive(Error, Debug)]
pub enum EditError {
    #[error("no text editor found. Please set EDITOR environment variable")]
    NoEditor,

    #[error("failed to prepare temporary file")]
    TempFile(#[source] std::io::Error),

    #[error("failed to run editor {editor}")]
    Launch {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor {editor} exited with {status}")]
    EditorFailed { editor: String, status: String },

    #[error("failed to read edited message")]
    ReadBack(#[source] std::io::Error),

    #[error("commit message cannot be empty")]
    EmptyMessage,
}
