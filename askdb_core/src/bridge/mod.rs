//! Translation backends that turn a question into model text.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::ProviderError;

pub mod gemini;
pub mod ollama;
pub mod prompt;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// A text generator that answers a question with text expected to hold a
/// query. The schema context is bound when the provider is built.
///
/// `Ok(None)` means the backend answered with nothing usable.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, question: &str) -> Result<Option<String>, ProviderError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[serde(alias = "gpt-oss")]
    Ollama,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Ollama, ProviderKind::Gemini];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "Ollama (local)",
            ProviderKind::Gemini => "Google Gemini",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "Local model served by Ollama's generate endpoint",
            ProviderKind::Gemini => "Hosted Gemini model, needs an API key",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" | "gpt-oss" => Ok(ProviderKind::Ollama),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!("unknown provider '{}', use 'ollama' or 'gemini'", other)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub available: bool,
}

/// Lists every backend with its availability under `config`. Ollama is
/// assumed reachable; Gemini needs its key variable set.
pub fn available_providers(config: &ProviderConfig) -> Vec<ProviderInfo> {
    ProviderKind::ALL
        .iter()
        .map(|kind| ProviderInfo {
            id: kind.id(),
            name: kind.display_name(),
            description: kind.description(),
            available: match kind {
                ProviderKind::Ollama => true,
                ProviderKind::Gemini => std::env::var(&config.gemini.api_key_env).is_ok(),
            },
        })
        .collect()
}

pub fn build_provider(
    kind: ProviderKind,
    config: &ProviderConfig,
    schema: &str,
) -> Result<Arc<dyn TranslationProvider>, ProviderError> {
    let provider: Arc<dyn TranslationProvider> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(&config.ollama, schema)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(&config.gemini, schema)?),
    };
    tracing::info!("Using {} translation provider", provider.name());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert_eq!("GPT-OSS".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert_eq!(" Gemini ".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert!("claude".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_gemini_unavailable_without_key() {
        let mut config = ProviderConfig::default();
        config.gemini.api_key_env = "ASKDB_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let providers = available_providers(&config);
        assert_eq!(providers.len(), 2);
        assert!(providers[0].available);
        assert_eq!(providers[1].id, "gemini");
        assert!(!providers[1].available);
    }

    #[test]
    fn test_build_gemini_without_key_fails() {
        let mut config = ProviderConfig::default();
        config.gemini.api_key_env = "ASKDB_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let err = build_provider(ProviderKind::Gemini, &config, "").err().unwrap();
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }
}
