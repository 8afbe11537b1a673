use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT: &str = "git-helper-utils";
pub const DEFAULT_SOURCE_BRANCH: &str = "development";
pub const DEFAULT_MAX_PROMPT_ATTEMPTS: u32 = 5;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M%S";

const ENV_PREFIX: &str = "GIT_HELPER_UTILS";

/// Location of the optional user config file
pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("com", DEFAULT_PROJECT, DEFAULT_PROJECT)
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Timestamp used in branch names and default output directories
pub fn format_timestamp(now: &DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub project_name: String,
    /// Root under which per-run output directories are created
    pub output_root: PathBuf,
    pub default_source_branch: String,
    pub max_prompt_attempts: u32,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT.to_string(),
            output_root: std::env::temp_dir().join(whoami::username()),
            default_source_branch: DEFAULT_SOURCE_BRANCH.to_string(),
            max_prompt_attempts: DEFAULT_MAX_PROMPT_ATTEMPTS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the user config file when present, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.merge_env_vars();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if config.max_prompt_attempts == 0 {
            tracing::warn!(
                "Ignoring max_prompt_attempts = 0 in {}; using {}",
                path.display(),
                DEFAULT_MAX_PROMPT_ATTEMPTS
            );
            config.max_prompt_attempts = DEFAULT_MAX_PROMPT_ATTEMPTS;
        }
        Ok(config)
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, keyed by `GIT_HELPER_UTILS_*` names.
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}_{suffix}"));

        if let Some(root) = var("OUTPUT_ROOT") {
            self.output_root = PathBuf::from(root);
        }

        if let Some(branch) = var("SOURCE_BRANCH") {
            self.default_source_branch = branch;
        }

        if let Some(attempts) = var("MAX_PROMPT_ATTEMPTS") {
            match attempts.parse::<u32>() {
                Ok(value) if value > 0 => self.max_prompt_attempts = value,
                _ => tracing::warn!(
                    "Ignoring invalid {}_MAX_PROMPT_ATTEMPTS value '{}'",
                    ENV_PREFIX,
                    attempts
                ),
            }
        }

        if let Some(level) = var("LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// `<output_root>/<project>/<script>/<timestamp>`
    pub fn default_outdir(&self, script: &str, timestamp: &str) -> PathBuf {
        self.output_root
            .join(&self.project_name)
            .join(script)
            .join(timestamp)
    }
}
