//! A single in-memory table.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use quarry_core::error::AppError;
use quarry_core::result::AppResult;
use quarry_core::traits::{Change, ChangeSet, Entity};
use quarry_core::types::EntityId;
use tokio::sync::RwLock;

use crate::store::row::{self, Row};

/// Rows of one entity type keyed by identity.
#[derive(Debug)]
pub struct MemoryTable<T> {
    state: RwLock<TableState<T>>,
}

#[derive(Debug, Clone)]
struct TableState<T> {
    rows: BTreeMap<EntityId, T>,
    /// `None` once `i64::MAX` has been used.
    next_id: Option<i64>,
}

impl<T: Entity> MemoryTable<T> {
    /// Create an empty table. Identities are assigned from 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                next_id: Some(1),
            }),
        }
    }

    /// Look up one row.
    pub async fn get(&self, id: EntityId) -> Option<T> {
        self.state.read().await.rows.get(&id).cloned()
    }

    /// Copy every row, in identity order.
    pub async fn snapshot(&self) -> Vec<T> {
        self.state.read().await.rows.values().cloned().collect()
    }

    /// Apply `changes` all-or-nothing.
    ///
    /// Changes are staged on a copy of the table and swapped in only when
    /// every change succeeded. Returns the added entities with identities.
    pub async fn apply(&self, changes: ChangeSet<T>) -> AppResult<Vec<T>> {
        let name = T::descriptor().name;
        let mut state = self.state.write().await;
        let mut staged = state.clone();
        let mut added = Vec::new();

        for change in changes {
            match change {
                Change::Added(mut entity) => {
                    let id = if entity.id().is_transient() {
                        let id = staged.next_id.ok_or_else(|| {
                            AppError::conflict(format!("'{name}' has no identities left to assign"))
                        })?;
                        staged.next_id = id.checked_add(1);
                        EntityId(id)
                    } else {
                        let id = entity.id();
                        if staged.rows.contains_key(&id) {
                            return Err(AppError::conflict(format!(
                                "'{name}' already holds a row with id {id}"
                            )));
                        }
                        if staged.next_id.is_some_and(|next| id.value() >= next) {
                            staged.next_id = id.value().checked_add(1);
                        }
                        id
                    };
                    entity.set_id(id);
                    staged.rows.insert(id, row::detach(&entity)?);
                    added.push(entity);
                }
                Change::Modified(entity) => {
                    let id = entity.id();
                    if !staged.rows.contains_key(&id) {
                        return Err(AppError::not_found(format!(
                            "Cannot update '{name}' {id}: no such row"
                        )));
                    }
                    staged.rows.insert(id, row::detach(&entity)?);
                }
                Change::Removed(id) => {
                    if staged.rows.remove(&id).is_none() {
                        return Err(AppError::not_found(format!(
                            "Cannot delete '{name}' {id}: no such row"
                        )));
                    }
                }
            }
        }

        *state = staged;
        Ok(added)
    }
}

impl<T: Entity> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased access to a table, used for the registry and for
/// materializing navigations into other entity types.
#[async_trait]
pub trait ErasedTable: Send + Sync + 'static {
    /// Recover the concrete table for downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Every row as JSON, in identity order.
    async fn rows(&self) -> AppResult<Vec<Row>>;
}

#[async_trait]
impl<T: Entity> ErasedTable for MemoryTable<T> {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    async fn rows(&self) -> AppResult<Vec<Row>> {
        self.snapshot().await.iter().map(row::to_row).collect()
    }
}
