//! Settings resolved from env-files, the process environment and flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Env-files read at startup, lowest precedence first.
pub const ENV_FILES: &[&str] = &[".env.prod", ".env"];

const DEFAULT_STORAGE_ROOT: &str = "storage";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;
const DEFAULT_POOL_SIZE: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required setting {key} is not set")]
    Missing { key: &'static str },

    #[error("Setting {key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read configuration")]
    Source(#[from] config::ConfigError),
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// PostgreSQL connection string.
    pub db_path: String,
    pub db_pool_size: u32,
    pub storage_root: PathBuf,
    pub fetch_timeout: Duration,
    pub user_agent: Option<String>,
}

/// One configuration layer. Keys are accepted in either case since env-files
/// and the environment spell them `DB_PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
struct Layer {
    #[serde(default, alias = "DB_PATH")]
    db_path: Option<String>,
    #[serde(default, alias = "DB_POOL_SIZE")]
    db_pool_size: Option<String>,
    #[serde(default, alias = "STORAGE_ROOT")]
    storage_root: Option<String>,
    #[serde(default, alias = "FETCH_TIMEOUT_SECS")]
    fetch_timeout_secs: Option<String>,
    #[serde(default, alias = "USER_AGENT")]
    user_agent: Option<String>,
}

impl Layer {
    /// Values from `over` win over values from `self`.
    fn merge(self, over: Layer) -> Layer {
        Layer {
            db_path: over.db_path.or(self.db_path),
            db_pool_size: over.db_pool_size.or(self.db_pool_size),
            storage_root: over.storage_root.or(self.storage_root),
            fetch_timeout_secs: over.fetch_timeout_secs.or(self.fetch_timeout_secs),
            user_agent: over.user_agent.or(self.user_agent),
        }
    }

    fn into_settings(self) -> Result<Settings, ConfigError> {
        let db_path = non_empty(self.db_path).ok_or(ConfigError::Missing { key: "DB_PATH" })?;

        let db_pool_size = parse_number(self.db_pool_size, "DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                value: "0".to_string(),
            });
        }

        let timeout = parse_number(
            self.fetch_timeout_secs,
            "FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?;

        Ok(Settings {
            db_path,
            db_pool_size,
            storage_root: non_empty(self.storage_root)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT)),
            fetch_timeout: Duration::from_secs(timeout),
            user_agent: non_empty(self.user_agent),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(value) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Builder for [`Settings`].
///
/// Precedence, lowest first: env-files in order, the process environment,
/// explicit overrides (command-line flags).
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    env_files: Vec<PathBuf>,
    environment: Option<Vec<(String, String)>>,
    overrides: Layer,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            env_files: ENV_FILES.iter().map(PathBuf::from).collect(),
            environment: None,
            overrides: Layer::default(),
        }
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the env-files to read. Missing files are skipped.
    pub fn env_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.env_files = files
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect();
        self
    }

    /// Use these variables instead of the process environment.
    pub fn environment<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.environment = Some(vars.into_iter().collect());
        self
    }

    pub fn storage_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.overrides.storage_root = Some(root.to_string_lossy().into_owned());
        }
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.overrides.fetch_timeout_secs = Some(secs.to_string());
        }
        self
    }

    pub fn load(self) -> Result<Settings, ConfigError> {
        let mut merged = Layer::default();

        for path in &self.env_files {
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "Env-file not found");
                continue;
            }
            let layer: Layer = Config::builder()
                .add_source(File::new(&path.to_string_lossy(), FileFormat::Ini))
                .build()?
                .try_deserialize()?;
            tracing::debug!(path = %path.display(), "Loaded env-file");
            merged = merged.merge(layer);
        }

        let mut environment = Environment::default();
        if let Some(vars) = self.environment {
            environment = environment.source(Some(vars.into_iter().collect()));
        }
        let layer: Layer = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        merged = merged.merge(layer);

        merged.merge(self.overrides).into_settings()
    }
}
