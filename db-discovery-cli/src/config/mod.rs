//! Connection parameters and the location of the bundled sample files

use std::path::PathBuf;

use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_PASSWORD: &str = "postgres";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;

/// Directory holding the sample spreadsheets shipped with the crate
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Everything needed to open a PostgreSQL connection
///
/// Passed by value; every operation opens and closes its own connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub db_name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ConnectionParams {
    pub fn new(
        db_name: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            db_name: db_name.into(),
            user: user.into(),
            password: password.into(),
            host: host.into(),
            port,
        }
    }

    /// Driver options for these parameters
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.db_name)
    }
}

/// Renders `user@host:port/db`, never the password
impl std::fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.db_name)
    }
}
