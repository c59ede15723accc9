//! Quarry: specification-driven data access.
//!
//! This facade re-exports the workspace crates and wires them together the
//! way an application does at startup: load configuration, initialise
//! logging, open the configured store, and hand out a repository.
//!
//! ```ignore
//! use quarry::prelude::*;
//!
//! let repo = quarry::bootstrap("development").await?;
//! let open = repo
//!     .list(&quarry::entity::order::specs::active_for_customer(EntityId(7)))
//!     .await?;
//! ```

pub use quarry_core as core;
pub use quarry_database as database;
pub use quarry_entity as entity;

use quarry_core::config::AppConfig;
use quarry_core::result::AppResult;
use quarry_database::store::{AnyStore, open_store};
use quarry_database::StoreRepository;

/// Environment variable naming the configuration overlay to load.
pub const ENV_VAR: &str = "QUARRY_ENV";

/// Commonly used items.
pub mod prelude {
    pub use quarry_core::error::{AppError, ErrorKind};
    pub use quarry_core::result::AppResult;
    pub use quarry_core::specification::{Field, Navigation, Specification};
    pub use quarry_core::traits::{Entity, HasIdentity, Repository, Store};
    pub use quarry_core::types::{EntityId, FieldValue, Filter, FilterOp, PageRequest, PageResponse};
    pub use quarry_database::{AnyStore, MemoryStore, PgStore, StoreRepository};
}

/// Load configuration for `env`, initialise logging and open the store.
pub async fn bootstrap(env: &str) -> AppResult<StoreRepository<AnyStore>> {
    let config = AppConfig::load(env)?;
    quarry_core::logging::init(&config.logging)?;
    tracing::info!(env, backend = ?config.store.backend, "Loaded configuration");
    from_config(&config).await
}

/// Open the store described by `config` and wrap it in a repository.
///
/// Does not touch the global logger.
pub async fn from_config(config: &AppConfig) -> AppResult<StoreRepository<AnyStore>> {
    Ok(StoreRepository::new(open_store(config).await?))
}

/// The environment named by [`ENV_VAR`], defaulting to `development`.
pub fn current_env() -> String {
    std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
}
