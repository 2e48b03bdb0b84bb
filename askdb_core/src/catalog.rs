use std::path::{Path, PathBuf};

use crate::error::ExecutionError;
use crate::executor::{list_tables, open_read_only, quote_identifier};
use crate::sql::types::{Column, DataType, TableSchema};

/// Read-only view of the tables in a SQLite database, used to describe the
/// dataset to translation providers.
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_tables(&self) -> Result<Vec<String>, ExecutionError> {
        let conn = open_read_only(&self.path)?;
        list_tables(&conn)
    }

    pub fn get_table(&self, name: &str) -> Result<Option<TableSchema>, ExecutionError> {
        let conn = open_read_only(&self.path)?;
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(name)))?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get("name")?;
                let declared: String = row.get("type")?;
                Ok(Column {
                    name,
                    data_type: DataType::from_declared(&declared),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Ok(None);
        }
        Ok(Some(TableSchema {
            name: name.to_string(),
            columns,
        }))
    }

    pub fn tables(&self) -> Result<Vec<TableSchema>, ExecutionError> {
        let mut schemas = Vec::new();
        for table_name in self.list_tables()? {
            if let Some(schema) = self.get_table(&table_name)? {
                schemas.push(schema);
            }
        }
        Ok(schemas)
    }

    /// One `TABLE name (col Type, ...)` line per table. An unreadable
    /// database yields an empty context rather than an error.
    pub fn schema_context(&self) -> String {
        match self.tables() {
            Ok(tables) => render_schema(&tables),
            Err(e) => {
                tracing::warn!("Could not read schema from {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }
}

pub fn render_schema(tables: &[TableSchema]) -> String {
    let mut schema = String::new();
    for table in tables {
        schema.push_str(&format!("TABLE {} (", table.name));
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {:?}", c.name, c.data_type))
            .collect();
        schema.push_str(&columns.join(", "));
        schema.push_str(")\n");
    }
    schema
}
