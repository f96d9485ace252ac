// commit message
pub const MAX_LINE_LENGTH: usize = 72;

// config
pub const CONFIG_DIR_NAME: &str = ".ai-commit";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_MAX_DIFF_SIZE: i64 = 10_000;
pub const DEFAULT_HISTORY_DEPTH: i64 = 5;
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const MAX_PREFIX_LENGTH: usize = 10;
pub const MAX_DESCRIPTION_LENGTH: usize = 50;

// generation
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const TEMPERATURE: f64 = 0.7;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const MAX_RETRIES: u32 = 3;

// editor
pub const FALLBACK_EDITORS: &[&str] = &["vim", "nano", "vi"];

// ui
pub const SPINNER_TICK_MILLIS: u64 = 100;
