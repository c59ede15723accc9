//! Ordering keys.
//!
//! NULL keys sort after every value ascending and before every value
//! descending, in both stores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Direction of an ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The `ORDER BY` suffix, including NULL placement.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC NULLS LAST",
            Self::Desc => "DESC NULLS FIRST",
        }
    }

    /// Order two keys in this direction.
    ///
    /// `values` compares the keys when neither is NULL.
    pub fn order_keys(
        &self,
        a_is_null: bool,
        b_is_null: bool,
        values: impl FnOnce() -> Ordering,
    ) -> Ordering {
        let ascending = match (a_is_null, b_is_null) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => values(),
        };
        match self {
            Self::Asc => ascending,
            Self::Desc => ascending.reverse(),
        }
    }
}

/// A column to order by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}
