//! Read a query result back into a dataset

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use colored::*;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column as _, Executor, Row, Statement, TypeInfo};

use super::connection::{close, open};
use super::types::kind_for_pg_type;
use crate::config::ConnectionParams;
use crate::dataset::{Column, Dataset, Value};

/// Run a SELECT and collect the full result, empty dataset on failure
pub async fn query_to_dataset(sql: &str, params: &ConnectionParams) -> Dataset {
    let result = match open(params).await {
        Ok(mut conn) => {
            let result = fetch_dataset(&mut conn, sql).await;
            close(conn).await;
            result
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(dataset) => {
            println!(
                "{} Query executed successfully. Data retrieved.",
                "✓".green()
            );
            dataset
        }
        Err(e) => {
            eprintln!("{} Error executing query: {:#}", "✗".red(), e);
            Dataset::default()
        }
    }
}

async fn fetch_dataset(conn: &mut PgConnection, sql: &str) -> Result<Dataset> {
    // Columns come from the prepared statement so an empty result keeps its header
    let statement = (&mut *conn)
        .prepare(sql)
        .await
        .context("Failed to prepare query")?;
    let header: Vec<(String, String)> = statement
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.type_info().name().to_string()))
        .collect();

    let rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch rows")?;
    log::debug!("Fetched {} rows with {} columns", rows.len(), header.len());

    let mut columns = Vec::with_capacity(header.len());
    for (idx, (name, type_name)) in header.into_iter().enumerate() {
        let values = rows
            .iter()
            .map(|row| decode_cell(row, idx, &type_name))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to read column '{}'", name))?;
        columns.push(Column::new(name, kind_for_pg_type(&type_name), values));
    }

    Dataset::from_columns(columns)
}

fn decode_cell(row: &PgRow, idx: usize, type_name: &str) -> Result<Value> {
    let value = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(|v| Value::Int(v.into())),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(|v| Value::Int(v.into())),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::Int),
        "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(|v| Value::Float(v.into())),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::Float),
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::Bool),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(Value::Timestamp),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|v| Value::Timestamp(v.naive_utc())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|v| Value::Timestamp(v.and_time(NaiveTime::MIN))),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(idx)?.map(Value::Text)
        }
        other => bail!(
            "Unsupported column type {}; cast it to text in the query",
            other
        ),
    };

    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use crate::postgres::test_support::{test_params, unreachable_params};

    #[tokio::test]
    async fn test_unreachable_returns_empty_dataset() {
        let dataset = query_to_dataset("SELECT 1", &unreachable_params()).await;
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_empty_result_keeps_columns() {
        let params = test_params();
        let dataset = query_to_dataset(
            "SELECT 1::int4 AS id, 'x'::text AS name WHERE false",
            &params,
        )
        .await;
        assert_eq!(dataset.shape(), (0, 2));
        assert_eq!(dataset.column("id").unwrap().kind(), &ColumnKind::Integer);
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_decodes_scalar_types() {
        let params = test_params();
        let dataset = query_to_dataset(
            "SELECT 7::int8 AS big, 1.5::float8 AS ratio, true AS flag, \
             DATE '2024-03-01' AS day, NULL::text AS note",
            &params,
        )
        .await;

        assert_eq!(dataset.shape(), (1, 5));
        let row = dataset.row(0).unwrap();
        assert_eq!(row[0], &Value::Int(7));
        assert_eq!(row[1], &Value::Float(1.5));
        assert_eq!(row[2], &Value::Bool(true));
        assert_eq!(
            row[3].as_timestamp().unwrap().to_string(),
            "2024-03-01 00:00:00"
        );
        assert_eq!(row[4], &Value::Null);
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_unsupported_type_yields_empty_dataset() {
        let params = test_params();
        let dataset = query_to_dataset("SELECT 1.25::numeric AS amount", &params).await;
        assert!(dataset.is_empty());
    }
}
