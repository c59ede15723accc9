//! Composed query descriptions.
//!
//! A [`Query`] is what a [`Collection`](crate::traits::Collection) executes:
//! a filter, include paths, an ordering key, and a row window. It is built
//! lazily from a base query by the [`evaluator`] and never touches a store.
//!
//! Stages always run in the order filter, order, window, includes, so a
//! query can only be refined in ways that keep that order meaningful.

pub mod evaluator;
pub mod include;

use std::marker::PhantomData;

use crate::error::AppError;
use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::filter::Filter;
use crate::types::sorting::SortField;

pub use evaluator::{count_query, get_query};
pub use include::{IncludeNode, IncludeTree};

/// A skip/take row window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Rows to skip.
    pub skip: u64,
    /// Rows to take after skipping; `None` takes the rest.
    pub take: Option<u64>,
}

impl Window {
    /// Apply the window to a row count, returning the visible count.
    pub fn visible(&self, rows: u64) -> u64 {
        let remaining = rows.saturating_sub(self.skip);
        match self.take {
            Some(take) => remaining.min(take),
            None => remaining,
        }
    }
}

/// A lazily composed query over entity type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<T> {
    filter: Option<Filter>,
    includes: Vec<String>,
    order: Option<SortField>,
    window: Option<Window>,
    entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Query<T> {
    /// The base query: every row of the collection.
    pub fn all() -> Self {
        Self {
            filter: None,
            includes: Vec::new(),
            order: None,
            window: None,
            entity: PhantomData,
        }
    }

    /// Keep only rows matching `filter` as well as any existing filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    /// Materialize a navigation path. Repeated paths are ignored.
    pub fn include(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !self.includes.contains(&path) {
            self.includes.push(path);
        }
        self
    }

    /// Order rows by `key`, replacing any previous ordering.
    pub fn order_by(mut self, key: SortField) -> Self {
        self.order = Some(key);
        self
    }

    /// Skip `count` rows of the current window.
    pub fn skip(mut self, count: u64) -> Self {
        self.window = Some(match self.window {
            None => Window {
                skip: count,
                take: None,
            },
            Some(window) => Window {
                skip: window.skip.saturating_add(count),
                take: window.take.map(|take| take.saturating_sub(count)),
            },
        });
        self
    }

    /// Take at most `count` rows of the current window.
    pub fn take(mut self, count: u64) -> Self {
        self.window = Some(match self.window {
            None => Window {
                skip: 0,
                take: Some(count),
            },
            Some(window) => Window {
                skip: window.skip,
                take: Some(window.take.map_or(count, |take| take.min(count))),
            },
        });
        self
    }

    /// Drop everything that shapes presentation rather than membership:
    /// includes, ordering, and the window.
    pub fn cardinality(self) -> Self {
        Self {
            filter: self.filter,
            includes: Vec::new(),
            order: None,
            window: None,
            entity: PhantomData,
        }
    }

    /// The filter; `None` matches every row.
    pub fn filter_expr(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Include paths in first-seen order.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// The ordering key.
    pub fn order(&self) -> Option<&SortField> {
        self.order.as_ref()
    }

    /// The row window.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Whether a row window has been applied.
    pub fn is_windowed(&self) -> bool {
        self.window.is_some()
    }

    /// Check every column, operand, and navigation against `T`'s descriptor.
    pub fn validate(&self) -> AppResult<()> {
        let descriptor = T::descriptor();

        if let Some(filter) = &self.filter {
            for condition in filter.conditions() {
                if !descriptor.has_column(&condition.field) {
                    return Err(AppError::invalid_argument(format!(
                        "Unknown column '{}' on '{}'",
                        condition.field, descriptor.name
                    )));
                }
                condition.validate_operand()?;
            }
        }

        if let Some(order) = &self.order {
            if !descriptor.has_column(&order.field) {
                return Err(AppError::invalid_argument(format!(
                    "Cannot order '{}' by unknown column '{}'",
                    descriptor.name, order.field
                )));
            }
        }

        IncludeTree::resolve(descriptor, &self.includes)?;
        Ok(())
    }
}
