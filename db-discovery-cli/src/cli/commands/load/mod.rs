//! `load-csv` command arguments

mod handler;

pub use handler::handle_load_command;

use clap::Args;
use std::path::PathBuf;

use crate::config::{self, ConnectionParams};

/// Connection options for the load; flags win over environment variables
#[derive(Debug, Clone, Args)]
pub struct LoadCommands {
    /// Database name
    #[arg(long, env = "DB_DISCOVERY_DB_NAME", default_value = config::DEFAULT_DB_NAME)]
    pub db_name: String,

    /// Username
    #[arg(long, env = "DB_DISCOVERY_USERNAME", default_value = config::DEFAULT_USER)]
    pub username: String,

    /// Password
    #[arg(
        long,
        env = "DB_DISCOVERY_PASSWORD",
        default_value = config::DEFAULT_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Host
    #[arg(long, env = "DB_DISCOVERY_HOST", default_value = config::DEFAULT_HOST)]
    pub host: String,

    /// Port
    #[arg(long, env = "DB_DISCOVERY_PORT", default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Directory containing the sample files (defaults to the bundled data)
    #[arg(long, env = "DB_DISCOVERY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl LoadCommands {
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(
            self.db_name.clone(),
            self.username.clone(),
            self.password.clone(),
            self.host.clone(),
            self.port,
        )
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(config::default_data_dir)
    }
}
