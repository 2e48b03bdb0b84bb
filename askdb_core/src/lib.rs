/// Module providing translation backends that turn questions into query text.
pub mod bridge;

/// Module reading table metadata used as schema context.
pub mod catalog;

/// Module loading and validating configuration.
pub mod config;

/// Module defining error types and the failure taxonomy.
pub mod error;

/// Module responsible for executing validated queries.
pub mod executor;

/// Module orchestrating translation, extraction, validation and execution.
pub mod pipeline;

/// Module for query extraction, validation and result types.
pub mod sql;

/// Re-exports for the translation provider interface and its backends.
pub use bridge::{GeminiProvider, OllamaProvider, ProviderKind, TranslationProvider};

/// Re-export of the Catalog used to describe the dataset.
pub use catalog::Catalog;

/// Re-export of the configuration root.
pub use config::AskConfig;

/// Re-exports of error types and failure reasons.
pub use error::{ExecutionError, FailureReason, ProviderError};

/// Re-exports of the executor interface and the SQLite implementation.
pub use executor::{QueryExecutor, SqliteExecutor};

/// Re-exports of the pipeline and its outcome types.
pub use pipeline::{PipelineOutcome, PipelineStats, QueryPipeline, QueryResponse, Telemetry};

/// Re-exports of the extractor and validator.
pub use sql::extract::QueryExtractor;
pub use sql::validate::QueryValidator;
