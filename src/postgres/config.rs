use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_postgres::NoTls;

use super::connection::PostgresConnection;
use crate::error::QuickDbError;

pub const DEFAULT_PORT: u16 = 5432;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Connection settings for a PostgreSQL server.
///
/// The connection is always opened with `client_encoding=UTF8`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresOptions {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub dbname: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for PostgresOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl PostgresOptions {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        dbname: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            dbname: dbname.into(),
            user: user.into(),
            password: password.into(),
            connect_timeout_secs: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    /// Read `QUICKDB_PG_HOST`, `QUICKDB_PG_PORT`, `QUICKDB_PG_DBNAME`, `QUICKDB_PG_USER`
    /// and `QUICKDB_PG_PASSWORD`.
    ///
    /// # Errors
    /// Returns `QuickDbError::ConfigError` if the host is unset or the port is not a number.
    pub fn from_env() -> Result<Self, QuickDbError> {
        let var = |name: &str| std::env::var(name).ok();
        let host = var("QUICKDB_PG_HOST")
            .ok_or_else(|| QuickDbError::ConfigError("QUICKDB_PG_HOST is not set".to_string()))?;
        let port = match var("QUICKDB_PG_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                QuickDbError::ConfigError(format!("QUICKDB_PG_PORT {raw:?}: {e}"))
            })?,
            None => DEFAULT_PORT,
        };
        Ok(Self::new(
            host,
            var("QUICKDB_PG_DBNAME").unwrap_or_else(|| "postgres".to_string()),
            var("QUICKDB_PG_USER").unwrap_or_else(|| "postgres".to_string()),
            var("QUICKDB_PG_PASSWORD").unwrap_or_default(),
        )
        .with_port(port))
    }

    /// # Errors
    /// Returns `QuickDbError::ConfigError` naming the first empty required field.
    pub fn validate(&self) -> Result<(), QuickDbError> {
        for (name, value) in [
            ("host", &self.host),
            ("dbname", &self.dbname),
            ("user", &self.user),
        ] {
            if value.trim().is_empty() {
                return Err(QuickDbError::ConfigError(format!("{name} is required")));
            }
        }
        if self.port == 0 {
            return Err(QuickDbError::ConfigError("port is required".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_tokio_config(&self) -> tokio_postgres::Config {
        let mut cfg = tokio_postgres::Config::new();
        cfg.host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .application_name("quick-db")
            .options("-c client_encoding=UTF8");
        if !self.password.is_empty() {
            cfg.password(&self.password);
        }
        if let Some(secs) = self.connect_timeout_secs {
            cfg.connect_timeout(Duration::from_secs(secs));
        }
        cfg
    }

    /// Connect and spawn the connection driver task.
    ///
    /// # Errors
    /// Returns `QuickDbError::ConfigError` for invalid options or
    /// `QuickDbError::ConnectionError` if the server cannot be reached.
    pub async fn connect(self) -> Result<PostgresConnection, QuickDbError> {
        self.validate()?;
        let (client, connection) = self
            .to_tokio_config()
            .connect(NoTls)
            .await
            .map_err(|e| QuickDbError::ConnectionError(format!("Failed to connect to Postgres: {e}")))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        tracing::info!(host = %self.host, port = self.port, dbname = %self.dbname, "connected to postgres");
        Ok(PostgresConnection::new(client))
    }
}
