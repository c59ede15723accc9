//! Store backend selection.

use serde::{Deserialize, Serialize};

/// Which store backend the repository runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local tables; contents vanish with the process.
    #[default]
    Memory,
    /// PostgreSQL through the `database` section.
    Postgres,
}

/// Store configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The backend to open.
    #[serde(default)]
    pub backend: StoreBackend,
}
