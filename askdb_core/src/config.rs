use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bridge::ProviderKind;
use crate::error::ConfigError;

/// Config file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "askdb.yaml";

pub const DEFAULT_DATABASE_PATH: &str = "askdb.db";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "gpt-oss:20b";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct AskConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Attach the generated query to outcomes unless a caller overrides it.
    #[serde(default)]
    pub include_sql: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Table whose row count `status` reports, e.g. `plays`.
    #[serde(default)]
    pub probe_table: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default)]
    pub ollama: OllamaSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaSettings {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}
fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}
fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.to_string()
}
fn default_gemini_url() -> String {
    DEFAULT_GEMINI_URL.to_string()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}
fn default_gemini_key_env() -> String {
    DEFAULT_GEMINI_KEY_ENV.to_string()
}
fn default_timeout_secs() -> u64 {
    500
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            provider: ProviderConfig::default(),
            include_sql: false,
            log_level: default_log_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            probe_table: None,
        }
    }
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            model: default_gemini_model(),
            api_key_env: default_gemini_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AskConfig {
    /// Load configuration: file (explicit path, or `askdb.yaml` if present),
    /// then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply `ASKDB_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ASKDB_DATABASE") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(kind) = lookup("ASKDB_PROVIDER") {
            match kind.parse() {
                Ok(kind) => self.provider.kind = kind,
                Err(e) => tracing::warn!("Ignoring ASKDB_PROVIDER: {}", e),
            }
        }
        if let Some(url) = lookup("ASKDB_OLLAMA_URL") {
            self.provider.ollama.url = url;
        }
        if let Some(model) = lookup("ASKDB_MODEL") {
            match self.provider.kind {
                ProviderKind::Ollama => self.provider.ollama.model = model,
                ProviderKind::Gemini => self.provider.gemini.model = model,
            }
        }
        if let Some(level) = lookup("ASKDB_LOG") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }
        for (field, url) in [
            ("provider.ollama.url", &self.provider.ollama.url),
            ("provider.gemini.base_url", &self.provider.gemini.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if self.provider.ollama.timeout_secs == 0 || self.provider.gemini.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider timeout must be positive".into()));
        }
        Ok(())
    }
}
