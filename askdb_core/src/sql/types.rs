use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Blob,
    Null,
}

impl DataType {
    /// Maps a declared SQLite column type onto a storage class using the
    /// affinity rules (`INT` first, then text, blob and real markers).
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            DataType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            DataType::Text
        } else if upper.contains("BOOL") {
            DataType::Boolean
        } else if upper.is_empty() || upper.contains("BLOB") {
            DataType::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            DataType::Float
        } else {
            // NUMERIC affinity; SQLite stores these as integers or reals
            DataType::Float
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Null,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
            Value::Blob(_) => DataType::Blob,
            Value::Null => DataType::Null,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

/// One result row; iteration order follows the statement's column order.
pub type Row = IndexMap<String, Value>;

/// Tabular output of a read query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_affinity() {
        assert_eq!(DataType::from_declared("INTEGER"), DataType::Integer);
        assert_eq!(DataType::from_declared("bigint"), DataType::Integer);
        assert_eq!(DataType::from_declared("VARCHAR(32)"), DataType::Text);
        assert_eq!(DataType::from_declared("DOUBLE"), DataType::Float);
        assert_eq!(DataType::from_declared("BOOLEAN"), DataType::Boolean);
        assert_eq!(DataType::from_declared(""), DataType::Blob);
        assert_eq!(DataType::from_declared("NUMERIC"), DataType::Float);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let mut row = Row::new();
        row.insert("name".to_string(), Value::Text("Goff".to_string()));
        row.insert("yards".to_string(), Value::Integer(4629));
        row.insert("team".to_string(), Value::Null);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"Goff","yards":4629,"team":null}"#);
    }
}
