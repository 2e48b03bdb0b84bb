use serde::{Deserialize, Serialize};

use super::telemetry::Telemetry;
use crate::error::FailureReason;
use crate::sql::types::{QueryResult, Row};

/// Result of one pipeline invocation. Failures are data, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Success {
        result: QueryResult,
        query: Option<String>,
        telemetry: Telemetry,
    },
    Failure {
        reason: FailureReason,
        query: Option<String>,
        telemetry: Telemetry,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            PipelineOutcome::Success { .. } => None,
            PipelineOutcome::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            PipelineOutcome::Success { result, .. } => Some(result),
            PipelineOutcome::Failure { .. } => None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.result().map(QueryResult::row_count).unwrap_or(0)
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Success { query, .. } | PipelineOutcome::Failure { query, .. } => {
                query.as_deref()
            }
        }
    }

    pub fn telemetry(&self) -> &Telemetry {
        match self {
            PipelineOutcome::Success { telemetry, .. }
            | PipelineOutcome::Failure { telemetry, .. } => telemetry,
        }
    }

    pub fn to_response(&self) -> QueryResponse {
        QueryResponse::from(self.clone())
    }
}

/// Flat response envelope handed to transports and printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub data: Option<Vec<Row>>,
    pub columns: Option<Vec<String>>,
    pub sql_query: Option<String>,
    pub error: Option<String>,
    pub reason: Option<FailureReason>,
    pub timing: Telemetry,
    pub rows_returned: usize,
}

impl From<PipelineOutcome> for QueryResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Success {
                result,
                query,
                telemetry,
            } => QueryResponse {
                success: true,
                rows_returned: result.row_count(),
                data: Some(result.rows),
                columns: Some(result.columns),
                sql_query: query,
                error: None,
                reason: None,
                timing: telemetry,
            },
            PipelineOutcome::Failure {
                reason,
                query,
                telemetry,
            } => QueryResponse {
                success: false,
                data: None,
                columns: None,
                sql_query: query,
                error: Some(reason.message().to_string()),
                reason: Some(reason),
                timing: telemetry,
                rows_returned: 0,
            },
        }
    }
}
