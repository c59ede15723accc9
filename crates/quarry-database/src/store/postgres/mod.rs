//! PostgreSQL store.
//!
//! Composed queries are translated to SQL by [`sql`]; rows come back as
//! `jsonb` and are decoded through serde. Each change set runs in one
//! transaction, which rolls back if the future is dropped before commit.

pub mod sql;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quarry_core::config::DatabaseConfig;
use quarry_core::error::AppError;
use quarry_core::query::Query;
use quarry_core::result::AppResult;
use quarry_core::traits::{Change, ChangeSet, Collection, Entity, Store};
use quarry_core::types::{EntityId, Filter};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use crate::error::store_error;
use crate::store::row;

/// Store backed by a PostgreSQL connection pool.
///
/// Every entity type maps to the table named by its descriptor, with one
/// column per descriptor column plus a `BIGINT` `"id"` key that defaults to
/// a sequence.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool described by `config`.
    ///
    /// An unreachable server surfaces as a transient store failure.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );
        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| store_error("Failed to connect to database", e))?;
        info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// `url` with the password of its user info replaced by `****`.
fn redact_url(url: &str) -> String {
    let authority_start = url.find("://").map_or(0, |i| i + 3);
    let Some(at) = url[authority_start..].rfind('@').map(|i| i + authority_start) else {
        return url.to_string();
    };
    match url[authority_start..at].find(':') {
        Some(colon) => {
            let user_end = authority_start + colon;
            format!("{}:****{}", &url[..user_end], &url[at..])
        }
        None => url.to_string(),
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn collection<T: Entity>(&self) -> AppResult<Arc<dyn Collection<T>>> {
        Ok(Arc::new(PgCollection::<T> {
            pool: self.pool.clone(),
            entity: PhantomData,
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let one = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("Health check failed", e))?;
        Ok(one == 1)
    }
}

/// [`Collection`] over one PostgreSQL table.
struct PgCollection<T> {
    pool: PgPool,
    entity: PhantomData<fn() -> T>,
}

impl<T: Entity> fmt::Debug for PgCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCollection")
            .field("table", &T::descriptor().name)
            .finish()
    }
}

#[async_trait]
impl<T: Entity> Collection<T> for PgCollection<T> {
    async fn find(&self, id: EntityId) -> AppResult<Option<T>> {
        let query = Query::<T>::all().filter(Filter::eq("id", id));
        let mut builder = sql::select(&query)?;
        let found = builder
            .build_query_scalar::<serde_json::Value>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(&format!("Failed to find '{}'", T::descriptor().name), e))?;
        found.map(row::from_value).transpose()
    }

    async fn fetch(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        query.validate()?;
        let mut builder = sql::select(query)?;
        let rows = builder
            .build_query_scalar::<serde_json::Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(&format!("Failed to list '{}'", T::descriptor().name), e))?;
        rows.into_iter().map(row::from_value).collect()
    }

    async fn count(&self, query: &Query<T>) -> AppResult<u64> {
        query.validate()?;
        let mut builder = sql::count(query)?;
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(&format!("Failed to count '{}'", T::descriptor().name), e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn commit(&self, changes: ChangeSet<T>) -> AppResult<Vec<T>> {
        let name = T::descriptor().name;
        let count = changes.len();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        let mut added = Vec::new();
        let mut explicit_keys = false;
        for change in changes {
            match change {
                Change::Added(mut entity) => {
                    explicit_keys |= !entity.id().is_transient();
                    let mut builder = sql::insert(&entity)?;
                    let id = builder
                        .build_query_scalar::<i64>()
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| store_error(&format!("Failed to insert into '{name}'"), e))?;
                    entity.set_id(EntityId(id));
                    added.push(entity);
                }
                Change::Modified(entity) => {
                    let mut builder = sql::update(&entity)?;
                    let result = builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| store_error(&format!("Failed to update '{name}'"), e))?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(format!(
                            "Cannot update '{name}' {}: no such row",
                            entity.id()
                        )));
                    }
                }
                Change::Removed(id) => {
                    let mut builder = sql::delete::<T>(id);
                    let result = builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| store_error(&format!("Failed to delete from '{name}'"), e))?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(format!(
                            "Cannot delete '{name}' {id}: no such row"
                        )));
                    }
                }
            }
        }

        if explicit_keys {
            let mut builder = sql::sync_sequence::<T>();
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| store_error(&format!("Failed to advance key sequence of '{name}'"), e))?;
        }

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit transaction", e))?;

        debug!(
            table = name,
            changes = count,
            added = added.len(),
            "Committed change set"
        );
        Ok(added)
    }
}
