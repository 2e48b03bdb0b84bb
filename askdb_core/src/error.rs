use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a translation backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{provider} returned an unexpected payload: {message}")]
    Payload {
        provider: &'static str,
        message: String,
    },

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Failure of the data store while running a validated query.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("could not open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Closed classification of pipeline failures. The message is what callers
/// see; underlying error text only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ProviderUnavailable,
    ExtractionFailed,
    ValidationFailed,
    ExecutionFailed,
    UnexpectedFailure,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::ProviderUnavailable => "provider unreachable or empty response",
            FailureReason::ExtractionFailed => "could not extract a query from the response",
            FailureReason::ValidationFailed => "candidate query failed safety validation",
            FailureReason::ExecutionFailed => "the data store could not run the query",
            FailureReason::UnexpectedFailure => "unexpected internal failure",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
