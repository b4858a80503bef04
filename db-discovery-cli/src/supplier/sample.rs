//! Synthetic employee table with one column of every kind

use anyhow::Result;
use chrono::NaiveDate;

use crate::dataset::{Column, ColumnKind, Dataset, Value};

/// Three made-up employees: INTEGER, TEXT, FLOAT, BOOLEAN and TIMESTAMP columns
pub fn pretend_employees() -> Result<Dataset> {
    let ints = |v: &[i64]| v.iter().copied().map(Value::Int).collect::<Vec<_>>();
    let created_at = [(2024, 1, 1), (2024, 2, 1), (2024, 3, 1)]
        .into_iter()
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0))
        .map(Value::Timestamp)
        .collect();

    let columns = vec![
        Column::new("id", ColumnKind::Integer, ints(&[1, 2, 3])),
        Column::new(
            "name",
            ColumnKind::Text,
            ["Joe", "Kyle", "Frank"]
                .iter()
                .map(|s| Value::Text(s.to_string()))
                .collect(),
        ),
        Column::new("age", ColumnKind::Integer, ints(&[25, 30, 35])),
        Column::new(
            "salary",
            ColumnKind::Float,
            vec![
                Value::Float(55000.50),
                Value::Float(62000.75),
                Value::Float(72000.00),
            ],
        ),
        Column::new(
            "is_active",
            ColumnKind::Boolean,
            vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)],
        ),
        Column::new("created_at", ColumnKind::Timestamp, created_at),
    ];

    Dataset::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_kinds() {
        let ds = pretend_employees().unwrap();
        assert_eq!(ds.shape(), (3, 6));
        let kinds: Vec<&ColumnKind> = ds.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                &ColumnKind::Integer,
                &ColumnKind::Text,
                &ColumnKind::Integer,
                &ColumnKind::Float,
                &ColumnKind::Boolean,
                &ColumnKind::Timestamp,
            ]
        );
        assert_eq!(
            ds.column("created_at").unwrap().values()[1].to_string(),
            "2024-02-01 00:00:00"
        );
    }
}
