//! Dataset to table loader
//!
//! Creates the target table from the dataset's column kinds and inserts every
//! row with a parameterized single-row INSERT, inside one transaction that is
//! committed after the last row.

use anyhow::{Context, Result};
use colored::*;
use sqlx::postgres::{PgArguments, PgConnection};
use sqlx::query::Query;
use sqlx::{Connection, Postgres};

use super::connection::{close, open};
use super::types::{SqlType, infer_sql_type};
use crate::config::ConnectionParams;
use crate::dataset::{Dataset, Value, normalize_column_name};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table layout derived from a dataset
///
/// Column names are normalized here, the dataset itself is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    table_name: String,
    columns: Vec<(String, SqlType)>,
}

impl TablePlan {
    pub fn new(dataset: &Dataset, table_name: &str) -> Self {
        let columns = dataset
            .columns()
            .iter()
            .map(|c| (normalize_column_name(c.name()), infer_sql_type(c.kind())))
            .collect();

        Self {
            table_name: table_name.to_string(),
            columns,
        }
    }

    pub fn columns(&self) -> &[(String, SqlType)] {
        &self.columns
    }

    /// `CREATE TABLE IF NOT EXISTS "<table>" (<col> <TYPE>, ...);`
    ///
    /// Column identifiers are interpolated as-is; they come from the dataset
    /// readers, not from user input.
    pub fn create_sql(&self) -> String {
        let definitions = self
            .columns
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({});",
            self.table_name, definitions
        )
    }

    /// `INSERT INTO "<table>" VALUES ($1, ..., $n);`
    pub fn insert_sql(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO \"{}\" VALUES ({});",
            self.table_name, placeholders
        )
    }
}

/// Create `table_name` from the dataset and insert all of its rows
///
/// Opens (and always closes) its own connection. Any failure is reported on
/// the console and turned into `false`.
pub async fn load_dataset(dataset: &Dataset, table_name: &str, params: &ConnectionParams) -> bool {
    let result = match open(params).await {
        Ok(mut conn) => {
            let result = write_table(&mut conn, dataset, table_name).await;
            close(conn).await;
            result
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(rows) => {
            println!(
                "{} Data inserted into '{}' successfully ({} rows).",
                "✓".green(),
                table_name,
                rows
            );
            true
        }
        Err(e) => {
            eprintln!(
                "{} Error creating table or inserting data: {:#}",
                "✗".red(),
                e
            );
            false
        }
    }
}

async fn write_table(conn: &mut PgConnection, dataset: &Dataset, table_name: &str) -> Result<usize> {
    let plan = TablePlan::new(dataset, table_name);

    // Dropping the transaction without commit rolls back everything below
    let mut tx = conn.begin().await.context("Failed to begin transaction")?;

    let create_sql = plan.create_sql();
    log::debug!("{}", create_sql);
    sqlx::query(&create_sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to create table '{}'", table_name))?;
    println!(
        "{} Table '{}' created or already exists.",
        "✓".green(),
        table_name
    );

    let insert_sql = plan.insert_sql();
    let mut inserted = 0;
    for (row_idx, row) in dataset.rows().enumerate() {
        let mut query = sqlx::query(&insert_sql);
        for (value, (column, sql_type)) in row.into_iter().zip(plan.columns()) {
            query = bind_value(query, value, *sql_type).with_context(|| {
                format!("Row {} of '{}', column '{}'", row_idx, table_name, column)
            })?;
        }

        query
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert row {} into '{}'", row_idx, table_name))?;
        inserted += 1;
    }

    tx.commit()
        .await
        .with_context(|| format!("Failed to commit '{}'", table_name))?;
    log::debug!("Committed {} rows into '{}'", inserted, table_name);

    Ok(inserted)
}

/// Bind one cell as the Rust type matching its column; nulls bind as typed NULLs
fn bind_value<'q>(query: PgQuery<'q>, value: &Value, sql_type: SqlType) -> Result<PgQuery<'q>> {
    let query = match sql_type {
        SqlType::Integer => query.bind(coerce(value, sql_type, Value::as_int)?),
        SqlType::Float => query.bind(coerce(value, sql_type, Value::as_float)?),
        SqlType::Boolean => query.bind(coerce(value, sql_type, Value::as_bool)?),
        SqlType::Timestamp => query.bind(coerce(value, sql_type, Value::as_timestamp)?),
        SqlType::Text => query.bind(value.to_text()),
    };
    Ok(query)
}

fn coerce<T>(value: &Value, sql_type: SqlType, convert: impl Fn(&Value) -> Option<T>) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    convert(value)
        .map(Some)
        .with_context(|| format!("Cannot store '{}' in a {} column", value, sql_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnKind};
    use crate::postgres::connection::{close, connect, run_query};
    use crate::postgres::drop::drop_table;
    use crate::postgres::query::query_to_dataset;
    use crate::postgres::test_support::{test_params, unreachable_params};
    use crate::supplier::pretend_employees;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn id_name_dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::infer("id", vec![Value::Int(1), Value::Int(2)]),
            Column::infer("name", vec![text("A"), Value::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_and_insert_sql() {
        let plan = TablePlan::new(&id_name_dataset(), "t1");
        assert_eq!(
            plan.create_sql(),
            "CREATE TABLE IF NOT EXISTS \"t1\" (id INTEGER, name TEXT);"
        );
        assert_eq!(plan.insert_sql(), "INSERT INTO \"t1\" VALUES ($1, $2);");
    }

    #[test]
    fn test_plan_normalizes_names_without_touching_dataset() {
        let dataset = Dataset::from_columns(vec![
            Column::infer("Blood Type", vec![text("A+")]),
            Column::new("Stay", ColumnKind::Other("duration".into()), vec![text("P1D")]),
        ])
        .unwrap();

        let plan = TablePlan::new(&dataset, "health_care");
        assert_eq!(
            plan.columns(),
            &[
                ("blood_type".to_string(), SqlType::Text),
                ("stay".to_string(), SqlType::Text)
            ]
        );
        assert_eq!(dataset.column_names(), vec!["Blood Type", "Stay"]);
    }

    #[test]
    fn test_every_kind_in_create_sql() {
        let plan = TablePlan::new(&pretend_employees().unwrap(), "pretend_employees");
        assert_eq!(
            plan.create_sql(),
            "CREATE TABLE IF NOT EXISTS \"pretend_employees\" (id INTEGER, name TEXT, age INTEGER, \
             salary FLOAT, is_active BOOLEAN, created_at TIMESTAMP);"
        );
    }

    #[test]
    fn test_coerce_rejects_mismatched_value() {
        assert_eq!(coerce(&Value::Null, SqlType::Integer, Value::as_int).unwrap(), None);
        assert_eq!(coerce(&Value::Int(4), SqlType::Float, Value::as_float).unwrap(), Some(4.0));
        assert!(coerce(&text("x"), SqlType::Integer, Value::as_int).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_returns_false() {
        assert!(!load_dataset(&id_name_dataset(), "t1", &unreachable_params()).await);
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_load_id_name_scenario() {
        let params = test_params();
        let mut conn = connect(&params).await.expect("test database reachable");
        assert!(drop_table(&mut conn, "t1").await);

        assert!(load_dataset(&id_name_dataset(), "t1", &params).await);

        let loaded = query_to_dataset("SELECT * FROM \"t1\"", &params).await;
        assert_eq!(loaded.shape(), (2, 2));
        assert_eq!(loaded.column("id").unwrap().kind(), &ColumnKind::Integer);
        assert_eq!(loaded.column("name").unwrap().kind(), &ColumnKind::Text);
        assert_eq!(loaded.row(0).unwrap(), vec![&Value::Int(1), &text("A")]);
        assert_eq!(loaded.row(1).unwrap(), vec![&Value::Int(2), &Value::Null]);

        let types = run_query(
            &mut conn,
            "SELECT string_agg(data_type, ',' ORDER BY ordinal_position) \
             FROM information_schema.columns WHERE table_name = 't1'",
        )
        .await
        .unwrap();
        assert_eq!(
            sqlx::Row::try_get::<String, _>(&types, 0).unwrap(),
            "integer,text"
        );

        assert!(drop_table(&mut conn, "t1").await);
        close(conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_round_trip_every_kind() {
        let params = test_params();
        let mut conn = connect(&params).await.expect("test database reachable");
        assert!(drop_table(&mut conn, "round_trip_employees").await);

        let original = pretend_employees().unwrap();
        assert!(load_dataset(&original, "round_trip_employees", &params).await);

        let loaded = query_to_dataset("SELECT * FROM \"round_trip_employees\"", &params).await;
        assert_eq!(loaded, original);

        assert!(drop_table(&mut conn, "round_trip_employees").await);
        close(conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL server"]
    async fn test_failed_insert_leaves_nothing_behind() {
        let params = test_params();
        let mut conn = connect(&params).await.expect("test database reachable");
        assert!(drop_table(&mut conn, "too_big").await);

        // i64::MAX does not fit an INTEGER column
        let dataset = Dataset::from_columns(vec![Column::infer(
            "n",
            vec![Value::Int(1), Value::Int(i64::MAX)],
        )])
        .unwrap();
        assert!(!load_dataset(&dataset, "too_big", &params).await);

        let exists = run_query(&mut conn, "SELECT to_regclass('public.too_big')::text")
            .await
            .unwrap();
        assert_eq!(sqlx::Row::try_get::<Option<String>, _>(&exists, 0).unwrap(), None);

        close(conn).await;
    }
}
