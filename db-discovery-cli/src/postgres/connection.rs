//! Connection lifecycle helpers
//!
//! Thin wrappers over the driver that report failures on the console and
//! return `None`/`false` instead of propagating errors.

use anyhow::{Context, Result};
use colored::*;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Row};

use crate::config::ConnectionParams;

/// Open a connection, propagating the driver error
pub(crate) async fn open(params: &ConnectionParams) -> Result<PgConnection> {
    log::debug!("Connecting to {}", params);
    PgConnection::connect_with(&params.connect_options())
        .await
        .with_context(|| format!("Failed to connect to {}", params))
}

/// Open a connection, `None` when the server is unreachable or rejects us
pub async fn connect(params: &ConnectionParams) -> Option<PgConnection> {
    match open(params).await {
        Ok(conn) => {
            println!("{} Connection to PostgreSQL successful!", "✓".green());
            Some(conn)
        }
        Err(e) => {
            eprintln!("{} Error connecting to PostgreSQL: {:#}", "✗".red(), e);
            None
        }
    }
}

/// Check that the connection still answers queries
pub async fn is_alive(conn: &mut PgConnection) -> bool {
    match sqlx::query("SELECT 1").execute(&mut *conn).await {
        Ok(_) => {
            log::debug!("Connection is active");
            true
        }
        Err(e) => {
            eprintln!("{} Connection lost: {}", "✗".red(), e);
            false
        }
    }
}

/// Run a statement and return its first row, if any
pub async fn run_query(conn: &mut PgConnection, sql: &str) -> Option<PgRow> {
    match sqlx::query(sql).fetch_optional(&mut *conn).await {
        Ok(row) => row,
        Err(e) => {
            eprintln!("{} Query execution failed: {}", "✗".red(), e);
            None
        }
    }
}

/// Server version string (`SELECT version()`)
pub async fn server_version(conn: &mut PgConnection) -> Option<String> {
    let row = run_query(conn, "SELECT version()").await?;
    match row.try_get::<String, _>(0) {
        Ok(version) => Some(version),
        Err(e) => {
            eprintln!("{} Could not read server version: {}", "✗".red(), e);
            None
        }
    }
}

/// Close a connection, logging (not failing) on error
pub async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        log::warn!("Failed to close connection cleanly: {}", e);
    }
}
