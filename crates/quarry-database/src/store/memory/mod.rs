//! In-memory store.
//!
//! Tables are registered on first use, one per entity type, and live as
//! long as any clone of the store. Useful for tests and for running the
//! service without a database.

mod eval;
mod include;
mod table;

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use quarry_core::error::AppError;
use quarry_core::query::{IncludeTree, Query};
use quarry_core::result::AppResult;
use quarry_core::traits::{ChangeSet, Collection, Entity, Store};
use quarry_core::types::EntityId;
use tracing::debug;

pub use table::{ErasedTable, MemoryTable};

use crate::error::StoreError;
use crate::store::row::{self, Row};

struct TableSlot {
    type_id: TypeId,
    table: Arc<dyn ErasedTable>,
}

/// Process-local store holding one [`MemoryTable`] per entity type.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<DashMap<&'static str, TableSlot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `T`, created on first use.
    pub fn table<T: Entity>(&self) -> AppResult<Arc<MemoryTable<T>>> {
        let name = T::descriptor().name;
        let slot = self.tables.entry(name).or_insert_with(|| {
            debug!(table = name, "Registering in-memory table");
            TableSlot {
                type_id: TypeId::of::<T>(),
                table: Arc::new(MemoryTable::<T>::new()),
            }
        });
        if slot.type_id != TypeId::of::<T>() {
            return Err(StoreError::TableTypeMismatch { table: name }.into());
        }

        Arc::clone(&slot.table)
            .into_any()
            .downcast::<MemoryTable<T>>()
            .map_err(|_| AppError::internal(format!("Table '{name}' failed to downcast")))
    }

    /// Rows of the named table as JSON; empty when nothing was stored yet.
    pub async fn table_rows(&self, name: &str) -> AppResult<Vec<Row>> {
        let table = self.tables.get(name).map(|slot| Arc::clone(&slot.table));
        match table {
            Some(table) => table.rows().await,
            None => Ok(Vec::new()),
        }
    }

    /// Names of the registered tables.
    pub fn table_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tables.iter().map(|entry| *entry.key()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tables", &self.table_names())
            .finish()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn collection<T: Entity>(&self) -> AppResult<Arc<dyn Collection<T>>> {
        Ok(Arc::new(MemoryCollection {
            table: self.table::<T>()?,
            store: self.clone(),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// [`Collection`] over one [`MemoryTable`].
struct MemoryCollection<T> {
    table: Arc<MemoryTable<T>>,
    store: MemoryStore,
}

impl<T: Entity> fmt::Debug for MemoryCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCollection")
            .field("table", &T::descriptor().name)
            .finish()
    }
}

impl<T: Entity> MemoryCollection<T> {
    /// Rows matching the filter, in identity order.
    async fn matching(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        let mut rows = Vec::new();
        for candidate in self.table.snapshot().await {
            let keep = match query.filter_expr() {
                Some(filter) => eval::matches(filter, &candidate)?,
                None => true,
            };
            if keep {
                rows.push(candidate);
            }
        }
        Ok(rows)
    }

    /// Filter, order and window the table without materializing includes.
    async fn select(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        let mut rows = self.matching(query).await?;

        if let Some(order) = query.order() {
            eval::sort_rows(&mut rows, order)?;
        }

        if let Some(window) = query.window() {
            let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
            let take = match window.take {
                Some(take) => usize::try_from(take).unwrap_or(usize::MAX),
                None => usize::MAX,
            };
            rows = rows.into_iter().skip(skip).take(take).collect();
        }

        Ok(rows)
    }
}

#[async_trait]
impl<T: Entity> Collection<T> for MemoryCollection<T> {
    async fn find(&self, id: EntityId) -> AppResult<Option<T>> {
        Ok(self.table.get(id).await)
    }

    async fn fetch(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        query.validate()?;
        let rows = self.select(query).await?;

        let tree = IncludeTree::resolve(T::descriptor(), query.includes())?;
        if tree.is_empty() {
            return Ok(rows);
        }

        let mut json = rows.iter().map(row::to_row).collect::<AppResult<Vec<_>>>()?;
        include::materialize(&self.store, &mut json, &tree.nodes).await?;
        json.into_iter().map(row::from_row).collect()
    }

    async fn count(&self, query: &Query<T>) -> AppResult<u64> {
        query.validate()?;
        let matched = self.matching(query).await?.len() as u64;
        Ok(query.window().map_or(matched, |window| window.visible(matched)))
    }

    async fn commit(&self, changes: ChangeSet<T>) -> AppResult<Vec<T>> {
        let count = changes.len();
        let added = self.table.apply(changes).await?;
        debug!(
            table = T::descriptor().name,
            changes = count,
            "Committed in-memory change set"
        );
        Ok(added)
    }
}
