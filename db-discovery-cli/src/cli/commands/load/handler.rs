//! Load command handler

use anyhow::Result;
use colored::*;

use super::LoadCommands;
use crate::config::ConnectionParams;
use crate::dataset::normalize_column_name;
use crate::postgres;
use crate::supplier::{self, SuppliedDataset};

/// Outcome of one run, per table
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

/// Read every dataset, drop all target tables, then load and verify each one
///
/// Table failures are reported, never returned as errors.
pub async fn handle_load_command(args: LoadCommands) -> Result<()> {
    let params = args.connection_params();
    let data_dir = args.data_dir();

    println!(
        "Reading sample data from {}",
        data_dir.display().to_string().cyan()
    );
    let datasets = supplier::supply_all(&data_dir);

    println!("Target database: {}", params.to_string().bright_green());
    drop_existing_tables(&params).await;

    let summary = load_all(&datasets, &params).await;
    print_summary(&summary);

    Ok(())
}

/// Drop every known table so names shared between datasets cannot collide
async fn drop_existing_tables(params: &ConnectionParams) {
    let Some(mut conn) = postgres::connect(params).await else {
        log::warn!("Skipping table drops, no connection to {}", params);
        return;
    };

    if !postgres::is_alive(&mut conn).await {
        postgres::close(conn).await;
        return;
    }
    if let Some(version) = postgres::server_version(&mut conn).await {
        log::info!("Connected to {}", version);
    }

    for table in supplier::table_names() {
        postgres::drop_table(&mut conn, table).await;
    }

    postgres::close(conn).await;
}

async fn load_all(datasets: &[SuppliedDataset], params: &ConnectionParams) -> LoadSummary {
    let mut summary = LoadSummary::default();

    for supplied in datasets {
        log::info!(
            "Loading {} rows into '{}'",
            supplied.dataset.row_count(),
            supplied.table
        );
        if postgres::load_dataset(&supplied.dataset, supplied.table, params).await
            && verify_table(supplied, params).await
        {
            summary.loaded.push(supplied.table);
        } else {
            summary.failed.push(supplied.table);
        }
    }

    summary
}

/// Read a loaded table back and check it has every column and row
async fn verify_table(supplied: &SuppliedDataset, params: &ConnectionParams) -> bool {
    let sql = format!("SELECT * FROM \"{}\"", supplied.table);
    let loaded = postgres::query_to_dataset(&sql, params).await;
    if loaded.is_empty() {
        eprintln!("{} Could not read back '{}'", "✗".red(), supplied.table);
        return false;
    }

    let missing: Vec<String> = supplied
        .dataset
        .column_names()
        .into_iter()
        .map(normalize_column_name)
        .filter(|name| loaded.column(name).is_none())
        .collect();
    if !missing.is_empty() {
        eprintln!(
            "{} Table '{}' is missing columns: {}",
            "✗".red(),
            supplied.table,
            missing.join(", ")
        );
        return false;
    }

    let expected = supplied.dataset.row_count();
    if loaded.row_count() != expected {
        eprintln!(
            "{} Table '{}' holds {} rows, expected {}",
            "✗".red(),
            supplied.table,
            loaded.row_count(),
            expected
        );
        return false;
    }

    log::info!("Verified {} rows in '{}'", expected, supplied.table);
    true
}

fn print_summary(summary: &LoadSummary) {
    println!();
    println!(
        "Loaded {} table(s): {}",
        summary.loaded.len(),
        summary.loaded.join(", ").green()
    );
    if !summary.failed.is_empty() {
        println!(
            "Failed {} table(s): {}",
            summary.failed.len(),
            summary.failed.join(", ").red()
        );
    }
}
