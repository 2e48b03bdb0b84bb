use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::build_prompt;
use super::TranslationProvider;
use crate::config::GeminiSettings;
use crate::error::ProviderError;

const PROVIDER: &str = "Gemini";

/// Calls the Gemini `generateContent` REST endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    schema: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    /// Reads the API key from the variable named in `settings`.
    pub fn new(settings: &GeminiSettings, schema: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&settings.api_key_env)
            .map_err(|_| ProviderError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::with_api_key(settings, api_key, schema)
    }

    pub fn with_api_key(
        settings: &GeminiSettings,
        api_key: impl Into<String>,
        schema: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                settings.base_url.trim_end_matches('/'),
                settings.model
            ),
            api_key: api_key.into(),
            schema: schema.into(),
        })
    }
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    async fn translate(&self, question: &str) -> Result<Option<String>, ProviderError> {
        let prompt = build_prompt(&self.schema, question);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
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

        let body: GenerateContentResponse =
            response.json().await.map_err(|e| ProviderError::Payload {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
