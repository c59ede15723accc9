//! Store backends.

pub mod memory;
pub mod postgres;
pub mod row;

use std::sync::Arc;

use async_trait::async_trait;
use quarry_core::config::{AppConfig, StoreBackend};
use quarry_core::result::AppResult;
use quarry_core::traits::{Collection, Entity, Store};
use tracing::info;

use self::memory::MemoryStore;
use self::postgres::PgStore;

/// A store whose backend is chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyStore {
    /// Process-local tables.
    Memory(MemoryStore),
    /// PostgreSQL.
    Postgres(PgStore),
}

#[async_trait]
impl Store for AnyStore {
    fn backend(&self) -> &'static str {
        match self {
            Self::Memory(store) => store.backend(),
            Self::Postgres(store) => store.backend(),
        }
    }

    fn collection<T: Entity>(&self) -> AppResult<Arc<dyn Collection<T>>> {
        match self {
            Self::Memory(store) => store.collection(),
            Self::Postgres(store) => store.collection(),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self {
            Self::Memory(store) => store.health_check().await,
            Self::Postgres(store) => store.health_check().await,
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgStore> for AnyStore {
    fn from(store: PgStore) -> Self {
        Self::Postgres(store)
    }
}

/// Open the store selected by `config.store.backend`.
///
/// The postgres backend requires a `[database]` section.
pub async fn open_store(config: &AppConfig) -> AppResult<AnyStore> {
    let store = match config.store.backend {
        StoreBackend::Memory => AnyStore::Memory(MemoryStore::new()),
        StoreBackend::Postgres => {
            AnyStore::Postgres(PgStore::connect(config.require_database()?).await?)
        }
    };
    info!(backend = store.backend(), "Store opened");
    Ok(store)
}
