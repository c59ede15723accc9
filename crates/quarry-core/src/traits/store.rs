//! Store collaborator traits.
//!
//! A [`Store`] hands out one [`Collection`] per entity type. Collections
//! execute composed [`Query`] descriptions and apply [`ChangeSet`]s; they
//! never see a [`Specification`](crate::specification::Specification).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::query::Query;
use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::id::EntityId;

/// A handle to the underlying storage engine.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug + 'static {
    /// Backend name (e.g. `"memory"`, `"postgres"`).
    fn backend(&self) -> &'static str;

    /// The collection holding entities of type `T`.
    fn collection<T: Entity>(&self) -> AppResult<Arc<dyn Collection<T>>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Per-entity-type access to a store.
#[async_trait]
pub trait Collection<T: Entity>: Send + Sync + fmt::Debug {
    /// Find one entity by key.
    async fn find(&self, id: EntityId) -> AppResult<Option<T>>;

    /// Execute a composed query and materialize its rows.
    async fn fetch(&self, query: &Query<T>) -> AppResult<Vec<T>>;

    /// Count the rows a composed query would return.
    async fn count(&self, query: &Query<T>) -> AppResult<u64>;

    /// Durably apply `changes` as one unit.
    ///
    /// Returns the added entities, in order, with their identities
    /// populated. If any change fails, none of them are applied.
    async fn commit(&self, changes: ChangeSet<T>) -> AppResult<Vec<T>>;
}

/// A pending change to one entity.
#[derive(Debug, Clone)]
pub enum Change<T> {
    /// Insert a new entity. A transient identity is assigned by the store.
    Added(T),
    /// Replace every column of an existing entity.
    Modified(T),
    /// Remove the entity with this identity.
    Removed(EntityId),
}

/// An ordered batch of changes committed atomically.
#[derive(Debug, Clone)]
pub struct ChangeSet<T> {
    changes: Vec<Change<T>>,
}

impl<T> ChangeSet<T> {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Queue an insert.
    pub fn add(mut self, entity: T) -> Self {
        self.changes.push(Change::Added(entity));
        self
    }

    /// Queue a full update.
    pub fn modify(mut self, entity: T) -> Self {
        self.changes.push(Change::Modified(entity));
        self
    }

    /// Queue a removal.
    pub fn remove(mut self, id: EntityId) -> Self {
        self.changes.push(Change::Removed(id));
        self
    }

    /// Number of queued changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Borrow the queued changes in order.
    pub fn changes(&self) -> &[Change<T>] {
        &self.changes
    }
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Change<T>> for ChangeSet<T> {
    fn from_iter<I: IntoIterator<Item = Change<T>>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for ChangeSet<T> {
    type Item = Change<T>;
    type IntoIter = std::vec::IntoIter<Change<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
