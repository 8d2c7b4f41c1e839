//! Configuration for connecting to a database and binding a tree to a table.
//!
//! Both structs deserialize with defaults for every missing field, so a config file
//! only needs to name what differs:
//!
//! ```
//! use nestedset::{BackendConfig, NestedSetConfig};
//!
//! let backend = BackendConfig::from_json(r#"{"url": "sqlite:tree.db?mode=rwc"}"#).unwrap();
//! assert_eq!(backend.max_connections, 5);
//!
//! let tree = NestedSetConfig::from_json(r#"{"table": "menu"}"#).unwrap();
//! assert!(tree.create_table);
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default table used when none is configured.
pub const DEFAULT_TABLE: &str = "tree";

/// Connection settings for [`SqlxBackend::connect_with`](crate::SqlxBackend::connect_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Database URL. `sqlite:` URLs select SQLite, `postgres:`/`postgresql:` PostgreSQL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before failing.
    pub acquire_timeout_secs: u64,
    /// SQLite only: how long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 30,
            busy_timeout_ms: 5000,
        }
    }
}

impl BackendConfig {
    /// Parse a configuration from JSON, filling in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings for a single nested-set tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestedSetConfig {
    /// Table holding the tree. Validated before use.
    pub table: String,
    /// Create the table and its indexes on open if missing.
    pub create_table: bool,
}

impl Default for NestedSetConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            create_table: true,
        }
    }
}

impl NestedSetConfig {
    /// Parse a configuration from JSON, filling in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
