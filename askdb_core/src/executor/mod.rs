use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::error::ExecutionError;
use crate::sql::types::{QueryResult, Row, Value};

/// Runs an already validated read query against the data store.
///
/// Implementations must tolerate concurrent calls; the pipeline invokes
/// `execute` from blocking worker threads.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, sql: &str) -> Result<QueryResult, ExecutionError>;
}

/// SQLite executor that opens a read-only connection per call, so concurrent
/// questions never share a handle and writes are refused by the engine too.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    path: PathBuf,
    probe_table: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub connected: bool,
    pub path: String,
    pub tables: Vec<String>,
    pub probe_rows: Option<i64>,
    pub error: Option<String>,
}

pub(crate) fn open_read_only(path: &Path) -> Result<Connection, ExecutionError> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| ExecutionError::Open {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn list_tables(conn: &Connection) -> Result<Vec<String>, ExecutionError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') \
         AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SqliteExecutor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            probe_table: None,
        }
    }

    /// Table whose row count is reported by [`SqliteExecutor::status`].
    pub fn with_probe_table(mut self, table: impl Into<String>) -> Self {
        self.probe_table = Some(table.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection check for status reporting. Failures are returned as data.
    ///
    /// `connected` only reflects whether the file opened; a failed table
    /// listing or probe count is reported in `error` alongside it.
    pub fn status(&self) -> StoreStatus {
        let mut status = StoreStatus {
            connected: false,
            path: self.path.display().to_string(),
            tables: Vec::new(),
            probe_rows: None,
            error: None,
        };

        let conn = match open_read_only(&self.path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Database connection failed: {}", e);
                status.error = Some(e.to_string());
                return status;
            }
        };
        status.connected = true;

        let inspect = || -> Result<(Vec<String>, Option<i64>), ExecutionError> {
            let tables = list_tables(&conn)?;
            let probe_rows = match &self.probe_table {
                Some(table) => Some(conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
                    [],
                    |row| row.get(0),
                )?),
                None => None,
            };
            Ok((tables, probe_rows))
        };

        match inspect() {
            Ok((tables, probe_rows)) => {
                status.tables = tables;
                status.probe_rows = probe_rows;
                if let Some(rows) = probe_rows {
                    tracing::info!("Database connection established: {} rows in probe table", rows);
                }
            }
            Err(e) => {
                tracing::warn!("Database reachable but inspection failed: {}", e);
                status.tables = list_tables(&conn).unwrap_or_default();
                status.error = Some(e.to_string());
            }
        }
        status
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, sql: &str) -> Result<QueryResult, ExecutionError> {
        let start = Instant::now();
        let conn = open_read_only(&self.path)?;
        let mut stmt = conn.prepare(sql)?;

        let columns = unique_column_names(stmt.column_names().into_iter().map(String::from));

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut record = Row::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), convert_value(row.get_ref(idx)?));
            }
            rows.push(record);
        }

        tracing::debug!("Query returned {} rows in {:?}", rows.len(), start.elapsed());
        Ok(QueryResult { columns, rows })
    }
}

/// Rename repeated result columns to `name:1`, `name:2`, ... so that every
/// value keeps its own key in the row map.
fn unique_column_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut columns = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while !taken.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}:{}", name, n);
        }
        columns.push(candidate);
    }
    columns
}

fn convert_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
