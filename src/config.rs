use crate::constants::{
    API_KEY_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_HISTORY_DEPTH, DEFAULT_MAX_DIFF_SIZE,
    DEFAULT_MODEL, MAX_DESCRIPTION_LENGTH, MAX_PREFIX_LENGTH,
};
use crate::error::ConfigError;
use crate::status;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;

static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z]+$").expect("prefix pattern should compile"));

/// a commit type the model is allowed to use, e.g. "feat" / "Add new feature"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub prefix: String,
    pub description: String,
}

impl Template {
    pub fn new(prefix: &str, description: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            description: description.to_string(),
        }
    }
}

/// user settings, persisted as yaml
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub api_key: String,
    pub max_diff_size: i64,
    pub history_depth: i64,
    pub templates: Vec<Template>,
    pub color_enabled: bool,
    pub model: String,
}

/// config as it appears on disk, every field optional
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_key: Option<String>,
    max_diff_size: Option<i64>,
    history_depth: Option<i64>,
    templates: Option<Vec<Template>>,
    color_enabled: Option<bool>,
    model: Option<String>,
}

impl Config {
    /// built-in defaults; `env_api_key` seeds the api key before any file is read
    pub fn defaults(env_api_key: Option<String>) -> Self {
        Self {
            api_key: env_api_key.unwrap_or_default(),
            max_diff_size: DEFAULT_MAX_DIFF_SIZE,
            history_depth: DEFAULT_HISTORY_DEPTH,
            templates: default_templates(),
            color_enabled: true,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// overlay values from the file; an empty api key in the file keeps the current one
    fn merge(mut self, raw: RawConfig) -> Self {
        if let Some(api_key) = raw.api_key
            && !api_key.trim().is_empty()
        {
            self.api_key = api_key.trim().to_string();
        }
        if let Some(max_diff_size) = raw.max_diff_size {
            self.max_diff_size = max_diff_size;
        }
        if let Some(history_depth) = raw.history_depth {
            self.history_depth = history_depth;
        }
        if let Some(templates) = raw.templates {
            self.templates = templates;
        }
        if let Some(color_enabled) = raw.color_enabled {
            self.color_enabled = color_enabled;
        }
        if let Some(model) = raw.model
            && !model.trim().is_empty()
        {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.max_diff_size <= 0 {
            return Err(ConfigError::InvalidMaxDiffSize(self.max_diff_size));
        }
        if self.history_depth <= 0 {
            return Err(ConfigError::InvalidHistoryDepth(self.history_depth));
        }
        for template in &self.templates {
            validate_template(template)?;
        }
        Ok(())
    }

    /// diff ceiling in bytes (only meaningful after `validate`)
    pub fn max_diff_bytes(&self) -> usize {
        usize::try_from(self.max_diff_size).unwrap_or(0)
    }

    /// number of commit subjects to fetch (only meaningful after `validate`)
    pub fn history_len(&self) -> usize {
        usize::try_from(self.history_depth).unwrap_or(0)
    }
}

fn validate_template(template: &Template) -> Result<(), ConfigError> {
    let prefix = &template.prefix;
    if prefix.len() > MAX_PREFIX_LENGTH || !PREFIX_PATTERN.is_match(prefix) {
        return Err(ConfigError::InvalidTemplatePrefix(prefix.clone()));
    }
    let description_len = template.description.chars().count();
    if description_len == 0 || description_len > MAX_DESCRIPTION_LENGTH {
        return Err(ConfigError::InvalidTemplateDescription(prefix.clone()));
    }
    Ok(())
}

fn default_templates() -> Vec<Template> {
    vec![
        Template::new("feat", "Add new feature"),
        Template::new("fix", "Fix a bug"),
        Template::new("chore", "Maintenance tasks"),
        Template::new("docs", "Documentation changes"),
        Template::new("style", "Code style changes"),
        Template::new("refactor", "Code refactoring"),
        Template::new("perf", "Performance improvements"),
        Template::new("test", "Add or modify tests"),
        Template::new("build", "Build system changes"),
        Template::new("ci", "CI configuration changes"),
    ]
}

/// read the api key from the environment, ignoring blank values
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// location of the config file plus load/save
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// `~/.ai-commit/config.yaml`
    pub fn locate() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::at(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// load and validate the config, writing defaults on first run
    pub fn load(&self, env_api_key: Option<String>) -> Result<Config, ConfigError> {
        let defaults = Config::defaults(env_api_key);
        let config = match self.read_raw()? {
            Some(raw) => defaults.merge(raw),
            None => {
                // the env key stays in memory only
                let on_disk = Config {
                    api_key: String::new(),
                    ..defaults.clone()
                };
                self.save(&on_disk)?;
                status!("Created default config at {}", self.path.display());
                defaults
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// the current settings without validation, or defaults when no file exists
    pub fn load_unvalidated(&self, env_api_key: Option<String>) -> Result<Config, ConfigError> {
        let defaults = Config::defaults(env_api_key);
        Ok(match self.read_raw()? {
            Some(raw) => defaults.merge(raw),
            None => defaults,
        })
    }

    /// serialise `config` and atomically replace the file, creating its directory
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        file.write_all(yaml.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }

    fn read_raw(&self) -> Result<Option<RawConfig>, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        };

        // an empty document is not a valid mapping for serde_yaml
        if contents.trim().is_empty() {
            return Ok(Some(RawConfig::default()));
        }

        serde_yaml::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn write_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}
