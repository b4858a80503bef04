//! Table removal

use anyhow::{Context, Result};
use colored::*;
use sqlx::postgres::PgConnection;

/// `DROP TABLE IF EXISTS "<table>" CASCADE;`
///
/// The table name is quoted but not escaped; names come from the fixed
/// dataset list, never from user input.
pub fn drop_table_sql(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS \"{}\" CASCADE;", table_name)
}

/// Drop a table and everything depending on it
///
/// Succeeds whether or not the table existed. Returns false when the
/// statement fails (e.g. the connection was lost).
pub async fn drop_table(conn: &mut PgConnection, table_name: &str) -> bool {
    match try_drop_table(conn, table_name).await {
        Ok(()) => {
            println!("{} Table '{}' dropped successfully.", "✓".green(), table_name);
            true
        }
        Err(e) => {
            eprintln!("{} Error dropping table '{}': {:#}", "✗".red(), table_name, e);
            false
        }
    }
}

async fn try_drop_table(conn: &mut PgConnection, table_name: &str) -> Result<()> {
    let sql = drop_table_sql(table_name);
    log::debug!("{}", sql);

    // Outside an explicit transaction the statement commits on its own
    sqlx::query(&sql)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to execute: {}", sql))?;
    Ok(())
}
