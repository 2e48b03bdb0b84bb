use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::build_prompt;
use super::TranslationProvider;
use crate::config::OllamaSettings;
use crate::error::ProviderError;

const PROVIDER: &str = "Ollama";

/// Talks to a local Ollama server through its non-streaming generate API.
pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    schema: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    pub fn new(settings: &OllamaSettings, schema: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            url: settings.url.clone(),
            model: settings.model.clone(),
            schema: schema.into(),
        })
    }
}

#[async_trait]
impl TranslationProvider for OllamaProvider {
    async fn translate(&self, question: &str) -> Result<Option<String>, ProviderError> {
        let prompt = build_prompt(&self.schema, question);
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status,
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| ProviderError::Payload {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let text = body.response.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
