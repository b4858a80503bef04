//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

use commands::load::LoadCommands;

/// Load the bundled sample spreadsheets into Postgres
#[derive(Debug, Parser)]
#[command(name = "db-discovery", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Drop, recreate and populate a table for every bundled dataset
    #[command(alias = "loadcsv")]
    LoadCsv(LoadCommands),
}
