//! db-discovery: load the bundled sample spreadsheets into PostgreSQL

mod cli;
mod config;
mod dataset;
mod postgres;
mod supplier;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before parsing so clap sees its variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let parsed = Cli::parse();

    match parsed.command {
        Commands::LoadCsv(args) => cli::commands::load::handle_load_command(args).await,
    }
}
