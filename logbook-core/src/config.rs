use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::LogbookError;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "logbook.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogbookConfig {
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JournalConfig {
    pub root: String,
    pub log_extensions: Vec<String>,
    pub exercise_extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            log_extensions: vec!["md".to_string()],
            exercise_extensions: vec!["py".to_string()],
            exclude: ["target", "node_modules", "venv", ".venv", "__pycache__"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl JournalConfig {
    /// Journal root with `~` and environment variables expanded.
    pub fn root_path(&self) -> PathBuf {
        match shellexpand::full(&self.root) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                tracing::warn!("Could not expand journal root {}: {}", self.root, e);
                PathBuf::from(&self.root)
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub title: String,
    pub key_wins_limit: usize,
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            title: "Learning Journal Overview".to_string(),
            key_wins_limit: crate::merge::DEFAULT_KEY_WINS_LIMIT,
            output: "OVERVIEW.md".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LogbookConfig {
    /// Load config from an optional TOML file layered with `LOGBOOK__*` env vars.
    ///
    /// A missing file is not an error: every section falls back to its defaults.
    pub fn load(path: &str) -> Result<Self, LogbookError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LOGBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("journal.log_extensions")
                    .with_list_parse_key("journal.exercise_extensions")
                    .with_list_parse_key("journal.exclude")
                    .try_parsing(true),
            )
            .build()?;
        Ok(s.try_deserialize()?)
    }
}
