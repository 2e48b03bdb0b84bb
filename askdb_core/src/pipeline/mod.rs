//! Question-to-result orchestration.
//!
//! One invocation walks `translate -> extract -> validate -> execute`, timing
//! the translation and execution phases. Any failure stops the walk and is
//! reported as a [`PipelineOutcome::Failure`]; nothing escapes as an error or
//! a panic. Each invocation bumps exactly one of the success/failure counters.

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::bridge::TranslationProvider;
use crate::error::FailureReason;
use crate::executor::QueryExecutor;
use crate::sql::extract::QueryExtractor;
use crate::sql::types::QueryResult;
use crate::sql::validate::QueryValidator;

pub mod outcome;
pub mod stats;
pub mod telemetry;

pub use outcome::{PipelineOutcome, QueryResponse};
pub use stats::{PipelineStats, StatsSnapshot};
pub use telemetry::Telemetry;

use telemetry::{EXECUTION_TIME, TRANSLATION_TIME};

pub struct QueryPipeline {
    provider: Arc<dyn TranslationProvider>,
    executor: Arc<dyn QueryExecutor>,
    stats: Arc<PipelineStats>,
}

impl QueryPipeline {
    pub fn new(provider: Arc<dyn TranslationProvider>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            provider,
            executor,
            stats: Arc::new(PipelineStats::new()),
        }
    }

    /// Use an externally owned counter pair instead of a fresh one.
    pub fn with_stats(mut self, stats: Arc<PipelineStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<PipelineStats> {
        &self.stats
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answer `question`. When `include_query` is set the extracted query is
    /// attached to the outcome whenever one was produced.
    pub async fn process(&self, question: &str, include_query: bool) -> PipelineOutcome {
        let span = tracing::info_span!("process", provider = self.provider.name());
        async {
            let mut telemetry = Telemetry::new();
            let mut query = None;

            tracing::info!("Processing question: {}", question);
            let result = self.run(question, &mut telemetry, &mut query).await;
            let query = if include_query { query } else { None };

            match result {
                Ok(result) => {
                    self.stats.record_success();
                    tracing::info!(
                        rows = result.row_count(),
                        total_time = ?telemetry.total_time(),
                        "Question answered"
                    );
                    PipelineOutcome::Success {
                        result,
                        query,
                        telemetry,
                    }
                }
                Err(reason) => {
                    self.stats.record_failure();
                    tracing::warn!(?reason, "Question failed: {}", reason);
                    PipelineOutcome::Failure {
                        reason,
                        query,
                        telemetry,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        question: &str,
        telemetry: &mut Telemetry,
        query: &mut Option<String>,
    ) -> Result<QueryResult, FailureReason> {
        // Translation runs as its own task so a panicking provider is contained
        let start = Instant::now();
        let provider = Arc::clone(&self.provider);
        let owned_question = question.to_string();
        let translated =
            tokio::spawn(async move { provider.translate(&owned_question).await }).await;
        telemetry.record(TRANSLATION_TIME, start.elapsed());

        let response = match translated {
            Ok(Ok(Some(text))) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                tracing::warn!("Provider returned an empty response");
                return Err(FailureReason::ProviderUnavailable);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Provider call failed");
                return Err(FailureReason::ProviderUnavailable);
            }
            Err(e) => {
                tracing::error!(error = %e, "Provider task aborted");
                return Err(FailureReason::UnexpectedFailure);
            }
        };

        let candidate = match QueryExtractor::extract(&response) {
            Some(candidate) if !candidate.is_empty() => candidate,
            _ => {
                tracing::debug!("No query found in response: {}", response);
                return Err(FailureReason::ExtractionFailed);
            }
        };
        tracing::debug!("Extracted query: {}", candidate);
        *query = Some(candidate.clone());

        if let Err(rejection) = QueryValidator::check(&candidate) {
            tracing::warn!(%rejection, "Rejected query: {}", candidate);
            return Err(FailureReason::ValidationFailed);
        }

        let start = Instant::now();
        let executor = Arc::clone(&self.executor);
        let executed = tokio::task::spawn_blocking(move || executor.execute(&candidate)).await;
        telemetry.record(EXECUTION_TIME, start.elapsed());
        telemetry.finish();

        match executed {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Query execution failed");
                Err(FailureReason::ExecutionFailed)
            }
            Err(e) => {
                tracing::error!(error = %e, "Query worker aborted");
                Err(FailureReason::UnexpectedFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, ProviderError};
    use crate::sql::types::{Row, Value};
    use async_trait::async_trait;

    enum Reply {
        Text(&'static str),
        Nothing,
        Fail,
        Panic,
    }

    struct ScriptedProvider(Reply);

    #[async_trait]
    impl TranslationProvider for ScriptedProvider {
        async fn translate(&self, _question: &str) -> Result<Option<String>, ProviderError> {
            match self.0 {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Nothing => Ok(None),
                Reply::Fail => Err(ProviderError::Payload {
                    provider: "Scripted",
                    message: "connection reset".to_string(),
                }),
                Reply::Panic => panic!("provider blew up"),
            }
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    enum Store {
        Rows(usize),
        Malformed,
        Panic,
    }

    struct FakeExecutor(Store);

    impl QueryExecutor for FakeExecutor {
        fn execute(&self, _sql: &str) -> Result<QueryResult, ExecutionError> {
            match self.0 {
                Store::Rows(n) => Ok(QueryResult {
                    columns: vec!["name".to_string()],
                    rows: (0..n)
                        .map(|i| {
                            let mut row = Row::new();
                            row.insert("name".to_string(), Value::Text(format!("player{}", i)));
                            row
                        })
                        .collect(),
                }),
                Store::Malformed => Err(ExecutionError::Query(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(1),
                    Some("near \"FROM\": syntax error".to_string()),
                ))),
                Store::Panic => panic!("driver blew up"),
            }
        }
    }

    fn pipeline(reply: Reply, store: Store) -> QueryPipeline {
        QueryPipeline::new(Arc::new(ScriptedProvider(reply)), Arc::new(FakeExecutor(store)))
    }

    const FENCED: &str = "Here is your query:\n```sql\nSELECT name FROM players LIMIT 5;\n```";

    #[tokio::test]
    async fn test_success_with_query() {
        let pipeline = pipeline(Reply::Text(FENCED), Store::Rows(5));
        let outcome = pipeline.process("top five players", true).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.row_count(), 5);
        assert_eq!(outcome.query(), Some("SELECT name FROM players LIMIT 5;"));
        let telemetry = outcome.telemetry();
        assert_eq!(
            telemetry.total_time(),
            Some(telemetry.translation_time().unwrap() + telemetry.execution_time().unwrap())
        );
        assert_eq!(pipeline.stats().snapshot(), StatsSnapshot { succeeded: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_query_omitted_unless_requested() {
        let outcome = pipeline(Reply::Text(FENCED), Store::Rows(1))
            .process("q", false)
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.query(), None);

        let outcome = pipeline(Reply::Text("SELECT 1; DROP TABLE x;"), Store::Rows(1))
            .process("q", false)
            .await;
        assert_eq!(outcome.reason(), Some(FailureReason::ValidationFailed));
        assert_eq!(outcome.query(), None);
    }

    #[tokio::test]
    async fn test_provider_failure_and_empty_reply() {
        for reply in [Reply::Fail, Reply::Nothing, Reply::Text("   ")] {
            let pipeline = pipeline(reply, Store::Rows(1));
            let outcome = pipeline.process("q", true).await;
            assert_eq!(outcome.reason(), Some(FailureReason::ProviderUnavailable));
            assert!(outcome.telemetry().translation_time().is_some());
            assert!(!outcome.telemetry().contains(telemetry::EXECUTION_TIME));
            assert_eq!(outcome.query(), None);
            assert_eq!(pipeline.stats().failed(), 1);
        }
    }

    #[tokio::test]
    async fn test_provider_panic_is_unexpected_failure() {
        let pipeline = pipeline(Reply::Panic, Store::Rows(1));
        let outcome = pipeline.process("q", true).await;
        assert_eq!(outcome.reason(), Some(FailureReason::UnexpectedFailure));
        assert_eq!(pipeline.stats().failed(), 1);
    }

    #[tokio::test]
    async fn test_extraction_failure() {
        let pipeline = pipeline(Reply::Text("I am not sure what you mean."), Store::Rows(1));
        let outcome = pipeline.process("q", true).await;
        assert_eq!(outcome.reason(), Some(FailureReason::ExtractionFailed));
        assert_eq!(outcome.query(), None);
    }

    #[tokio::test]
    async fn test_empty_fence_is_extraction_failure() {
        let pipeline = pipeline(Reply::Text("```sql\n\n```"), Store::Rows(1));
        let outcome = pipeline.process("q", true).await;
        assert_eq!(outcome.reason(), Some(FailureReason::ExtractionFailed));
    }

    #[tokio::test]
    async fn test_validation_failure_carries_rejected_query() {
        let pipeline = pipeline(
            Reply::Text("SELECT * FROM users; DROP TABLE users;"),
            Store::Rows(1),
        );
        let outcome = pipeline.process("q", true).await;
        assert_eq!(outcome.reason(), Some(FailureReason::ValidationFailed));
        assert_eq!(outcome.query(), Some("SELECT * FROM users; DROP TABLE users;"));
        assert!(outcome.telemetry().execution_time().is_none());
    }

    #[tokio::test]
    async fn test_execution_failure_keeps_both_timings() {
        let pipeline = pipeline(Reply::Text(FENCED), Store::Malformed);
        let outcome = pipeline.process("q", true).await;
        assert_eq!(outcome.reason(), Some(FailureReason::ExecutionFailed));
        let telemetry = outcome.telemetry();
        assert!(telemetry.execution_time().is_some());
        assert_eq!(
            telemetry.total_time(),
            Some(telemetry.translation_time().unwrap() + telemetry.execution_time().unwrap())
        );
        assert_eq!(outcome.query(), Some("SELECT name FROM players LIMIT 5;"));
    }

    #[tokio::test]
    async fn test_executor_panic_is_unexpected_failure() {
        let pipeline = pipeline(Reply::Text(FENCED), Store::Panic);
        let outcome = pipeline.process("q", false).await;
        assert_eq!(outcome.reason(), Some(FailureReason::UnexpectedFailure));
        assert_eq!(pipeline.stats().snapshot(), StatsSnapshot { succeeded: 0, failed: 1 });
    }

    #[tokio::test]
    async fn test_shared_stats_across_pipelines() {
        let stats = Arc::new(PipelineStats::new());
        let ok = pipeline(Reply::Text(FENCED), Store::Rows(2)).with_stats(Arc::clone(&stats));
        let bad = pipeline(Reply::Nothing, Store::Rows(2)).with_stats(Arc::clone(&stats));

        ok.process("q", false).await;
        bad.process("q", false).await;
        ok.process("q", false).await;

        assert_eq!(stats.snapshot(), StatsSnapshot { succeeded: 2, failed: 1 });
        assert_eq!(ok.provider_name(), "Scripted");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_invocations_count_once_each() {
        let pipeline = Arc::new(pipeline(Reply::Text(FENCED), Store::Rows(3)));
        let handles: Vec<_> = (0..64)
            .map(|_| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move { pipeline.process("q", false).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_success());
        }
        assert_eq!(pipeline.stats().succeeded(), 64);
        assert_eq!(pipeline.stats().failed(), 0);
    }
}
