//! Column type inference

use crate::dataset::ColumnKind;

/// SQL column types the loader creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Float,
    Boolean,
    Timestamp,
    Text,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Float => "FLOAT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Map a column's declared kind to the SQL type of its table column
///
/// Only the kind matters, never the values: an Integer column full of nulls
/// is still INTEGER.
pub fn infer_sql_type(kind: &ColumnKind) -> SqlType {
    match kind {
        ColumnKind::Integer => SqlType::Integer,
        ColumnKind::Float => SqlType::Float,
        ColumnKind::Boolean => SqlType::Boolean,
        ColumnKind::Timestamp => SqlType::Timestamp,
        ColumnKind::Text => SqlType::Text,
        // Unrecognized kinds are stored as text
        ColumnKind::Other(_) => SqlType::Text,
    }
}

/// Kind of a result column, from the server's type name
pub fn kind_for_pg_type(type_name: &str) -> ColumnKind {
    match type_name {
        "INT2" | "INT4" | "INT8" => ColumnKind::Integer,
        "FLOAT4" | "FLOAT8" => ColumnKind::Float,
        "BOOL" => ColumnKind::Boolean,
        "TIMESTAMP" | "TIMESTAMPTZ" | "DATE" => ColumnKind::Timestamp,
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => ColumnKind::Text,
        other => ColumnKind::Other(other.to_lowercase()),
    }
}
