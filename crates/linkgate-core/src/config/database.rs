//! `[database]` section: the PostgreSQL pool behind the `sql` share driver.

use serde::{Deserialize, Serialize};

/// Pool settings for the `oc_share` database.
///
/// Only read when `public_share.driver` is `sql` or when running
/// migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres://` URL. Credentials are redacted when printed.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// Seconds to wait for a free connection.
    pub connect_timeout_seconds: u64,
    /// Seconds before an unused connection is closed.
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/linkgate".to_string(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 300,
        }
    }
}
