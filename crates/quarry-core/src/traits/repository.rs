//! Generic repository contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::specification::Specification;
use crate::traits::entity::Entity;
use crate::types::id::EntityId;
use crate::types::pagination::PageResponse;

/// Persistence-ignorant CRUD and query surface over any entity type.
///
/// Methods are generic over the entity type, so one repository value serves
/// every entity registered with its store. Store failures propagate
/// unchanged; nothing is retried here.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Look up one entity by key. A missing key is `Ok(None)`.
    async fn get_by_id<T: Entity>(&self, id: EntityId) -> AppResult<Option<T>>;

    /// The first entity, in result order, matched by `spec`.
    ///
    /// Uniqueness is not checked; encode it in the criteria if it matters.
    async fn get_single_by_spec<T: Entity>(&self, spec: &Specification<T>)
    -> AppResult<Option<T>>;

    /// Every entity of type `T`, in store order.
    async fn list_all<T: Entity>(&self) -> AppResult<Vec<T>>;

    /// The entities matched by `spec`, filtered, ordered, and paged.
    async fn list<T: Entity>(&self, spec: &Specification<T>) -> AppResult<Vec<T>>;

    /// Number of entities matching the criteria of `spec`.
    ///
    /// Ordering, includes, and paging do not affect the result.
    async fn count<T: Entity>(&self, spec: &Specification<T>) -> AppResult<u64>;

    /// Persist a new entity and return it with its identity populated.
    async fn add<T: Entity>(&self, entity: T) -> AppResult<T>;

    /// Persist several new entities as one unit.
    async fn add_range<T: Entity>(&self, entities: Vec<T>) -> AppResult<Vec<T>>;

    /// Overwrite a persisted entity. Fails with `NotFound` if its identity
    /// is not stored.
    async fn update<T: Entity>(&self, entity: &T) -> AppResult<()>;

    /// Overwrite several persisted entities as one unit.
    async fn update_range<T: Entity>(&self, entities: &[T]) -> AppResult<()>;

    /// Remove a persisted entity. Fails with `NotFound` if its identity is
    /// not stored.
    async fn delete<T: Entity>(&self, entity: &T) -> AppResult<()>;

    /// Remove several persisted entities as one unit.
    async fn delete_range<T: Entity>(&self, entities: &[T]) -> AppResult<()>;

    /// One page of `spec` together with the total size of its filtered set.
    async fn list_page<T: Entity>(&self, spec: &Specification<T>) -> AppResult<PageResponse<T>> {
        let items = self.list(spec).await?;
        if !spec.is_paging_enabled() {
            return Ok(PageResponse::unpaged(items));
        }

        let total = self.count(spec).await?;
        let skip = u64::try_from(spec.skip()).unwrap_or(0);
        let take = u64::try_from(spec.take()).unwrap_or(0);
        Ok(PageResponse::from_window(items, skip, take, total))
    }
}
