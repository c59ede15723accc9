//! Generic repository over any store.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use quarry_core::error::AppError;
use quarry_core::query::{Query, count_query, get_query};
use quarry_core::result::AppResult;
use quarry_core::specification::Specification;
use quarry_core::traits::{Change, ChangeSet, Entity, Repository, Store};
use quarry_core::types::EntityId;

/// [`Repository`] implementation that evaluates specifications into
/// composed queries and hands them to a [`Store`].
///
/// Holds only the store handle; clones share it.
#[derive(Debug, Clone)]
pub struct StoreRepository<S> {
    store: S,
}

impl<S: Store> StoreRepository<S> {
    /// Create a repository over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn commit<T: Entity>(&self, changes: ChangeSet<T>) -> AppResult<Vec<T>> {
        let count = changes.len();
        self.store
            .collection::<T>()?
            .commit(changes)
            .await
            .inspect_err(|e| {
                if e.kind.is_store_failure() {
                    warn!(
                        entity = T::descriptor().name,
                        changes = count,
                        error = %e,
                        "Change set was not committed"
                    );
                }
            })
    }
}

/// Reject identities that cannot address a stored row.
fn require_persisted<T: Entity>(entity: &T, operation: &str) -> AppResult<EntityId> {
    let id = entity.id();
    if id.is_transient() {
        return Err(AppError::invalid_argument(format!(
            "Cannot {operation} '{}' without a persisted id (got {id})",
            T::descriptor().name
        )));
    }
    Ok(id)
}

#[async_trait]
impl<S: Store> Repository for StoreRepository<S> {
    async fn get_by_id<T: Entity>(&self, id: EntityId) -> AppResult<Option<T>> {
        if id.is_transient() {
            return Ok(None);
        }
        self.store.collection::<T>()?.find(id).await
    }

    async fn get_single_by_spec<T: Entity>(
        &self,
        spec: &Specification<T>,
    ) -> AppResult<Option<T>> {
        let query = get_query(Query::all(), spec)?.take(1);
        let rows = self.store.collection::<T>()?.fetch(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_all<T: Entity>(&self) -> AppResult<Vec<T>> {
        self.store.collection::<T>()?.fetch(&Query::all()).await
    }

    async fn list<T: Entity>(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        let query = get_query(Query::all(), spec)?;
        let rows = self.store.collection::<T>()?.fetch(&query).await?;
        debug!(
            entity = T::descriptor().name,
            count = rows.len(),
            "Listed entities"
        );
        Ok(rows)
    }

    async fn count<T: Entity>(&self, spec: &Specification<T>) -> AppResult<u64> {
        let query = count_query(Query::all(), spec)?;
        self.store.collection::<T>()?.count(&query).await
    }

    async fn add<T: Entity>(&self, entity: T) -> AppResult<T> {
        let added = self.commit(ChangeSet::new().add(entity)).await?;
        let entity = added.into_iter().next().ok_or_else(|| {
            AppError::internal(format!(
                "Store returned no row for added '{}'",
                T::descriptor().name
            ))
        })?;
        info!(entity = T::descriptor().name, id = %entity.id(), "Entity added");
        Ok(entity)
    }

    async fn add_range<T: Entity>(&self, entities: Vec<T>) -> AppResult<Vec<T>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        let added = self
            .commit(entities.into_iter().map(Change::Added).collect())
            .await?;
        info!(
            entity = T::descriptor().name,
            count = added.len(),
            "Entities added"
        );
        Ok(added)
    }

    async fn update<T: Entity>(&self, entity: &T) -> AppResult<()> {
        let id = require_persisted(entity, "update")?;
        self.commit(ChangeSet::new().modify(entity.clone())).await?;
        info!(entity = T::descriptor().name, id = %id, "Entity updated");
        Ok(())
    }

    async fn update_range<T: Entity>(&self, entities: &[T]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let mut changes = ChangeSet::new();
        for entity in entities {
            require_persisted(entity, "update")?;
            changes = changes.modify(entity.clone());
        }
        self.commit(changes).await?;
        info!(
            entity = T::descriptor().name,
            count = entities.len(),
            "Entities updated"
        );
        Ok(())
    }

    async fn delete<T: Entity>(&self, entity: &T) -> AppResult<()> {
        let id = require_persisted(entity, "delete")?;
        self.commit(ChangeSet::<T>::new().remove(id)).await?;
        info!(entity = T::descriptor().name, id = %id, "Entity deleted");
        Ok(())
    }

    async fn delete_range<T: Entity>(&self, entities: &[T]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let mut changes = ChangeSet::<T>::new();
        for entity in entities {
            changes = changes.remove(require_persisted(entity, "delete")?);
        }
        self.commit(changes).await?;
        info!(
            entity = T::descriptor().name,
            count = entities.len(),
            "Entities deleted"
        );
        Ok(())
    }
}
