//! Credential store: the persisted `{api key, line number, base URL}` record.
//!
//! Structure:
//! - Pure functions: path construction, env overrides, validation, masking
//! - Effect functions: reading and writing `~/.smsir/config.json`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the home directory holding all smsir state.
const CONFIG_DIR_NAME: &str = ".smsir";

/// Credentials filename within the config directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Log filename written by the interactive menu.
const LOG_FILE_NAME: &str = "smsir.log";

/// SMS.ir API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.sms.ir/v1";

/// Env vars consulted after the file is read.
const ENV_API_KEY: &str = "SMSIR_API_KEY";
const ENV_LINE_NUMBER: &str = "SMSIR_LINE_NUMBER";
const ENV_BASE_URL: &str = "SMSIR_BASE_URL";

// ============================================================================
// TYPES
// ============================================================================

/// Everything needed to talk to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// `X-API-KEY` header value.
    #[serde(default)]
    pub api_key: String,
    /// Default sending line, kept as typed by the user.
    #[serde(default)]
    pub line_number: String,
    /// API root, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            line_number: String::new(),
            base_url: default_base_url(),
        }
    }
}

/// Failure loading, saving or validating credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to get user home directory")]
    HomeNotFound,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("api key is required")]
    MissingApiKey,

    #[error("line number is required")]
    MissingLineNumber,
}

impl Credentials {
    /// Both fields a remote call depends on must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.line_number.is_empty() {
            return Err(ConfigError::MissingLineNumber);
        }
        Ok(())
    }

    /// Apply `SMSIR_*` overrides using the given lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(line) = lookup(ENV_LINE_NUMBER) {
            self.line_number = line;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        self
    }
}

/// Mask a secret for display: first and last four characters survive.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

// ============================================================================
// PURE FUNCTIONS (Paths)
// ============================================================================

/// `~/.smsir` for the given home directory.
pub fn config_dir(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME)
}

/// `~/.smsir/config.json` for the given home directory.
pub fn config_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE_NAME)
}

/// Log file kept next to the given config file.
pub fn log_path_for(config_file: &Path) -> PathBuf {
    config_file.with_file_name(LOG_FILE_NAME)
}

/// Config file location for the current user.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(config_path(&home))
}

// ============================================================================
// STORE
// ============================================================================

/// Load/save seam used by the launcher and the command handlers.
pub trait CredentialStore: Send {
    /// Read the current credentials (file, then env overrides).
    fn load(&self) -> Result<Credentials, ConfigError>;

    /// Read the persisted record only, ignoring env overrides. Use this as
    /// the base for anything that is saved back.
    fn load_stored(&self) -> Result<Credentials, ConfigError>;

    /// Persist the given credentials.
    fn save(&self, credentials: &Credentials) -> Result<(), ConfigError>;
}

/// JSON file backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    env: EnvSource,
}

/// Where `SMSIR_*` overrides come from.
#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Ignored,
    #[cfg(test)]
    Fixed(Vec<(String, String)>),
}

impl EnvSource {
    fn apply(&self, credentials: Credentials) -> Credentials {
        match self {
            EnvSource::Process => credentials.with_overrides(|name| std::env::var(name).ok()),
            EnvSource::Ignored => credentials,
            #[cfg(test)]
            EnvSource::Fixed(vars) => credentials.with_overrides(|name| {
                vars.iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.clone())
            }),
        }
    }
}

impl FileStore {
    /// Store at an explicit path, honouring `SMSIR_*` overrides.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env: EnvSource::Process,
        }
    }

    /// Store at `~/.smsir/config.json`.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(default_config_path()?))
    }

    /// Ignore the process environment.
    pub fn without_env(mut self) -> Self {
        self.env = EnvSource::Ignored;
        self
    }

    /// Use a fixed set of overrides instead of the process environment.
    #[cfg(test)]
    pub(crate) fn with_env_vars(mut self, vars: &[(&str, &str)]) -> Self {
        self.env = EnvSource::Fixed(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn ensure_parent(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        Ok(())
    }

    fn write(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        self.ensure_parent()?;
        let json = serde_json::to_string_pretty(credentials).map_err(|source| {
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Credentials, ConfigError> {
        Ok(self.env.apply(self.load_stored()?))
    }

    fn load_stored(&self) -> Result<Credentials, ConfigError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "creating default config file");
            self.write(&Credentials::default())?;
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let mut credentials: Credentials =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if credentials.base_url.is_empty() {
            credentials.base_url = default_base_url();
        }

        Ok(credentials)
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        self.write(credentials)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
