//! Declarative query descriptions.
//!
//! A [`Specification`] describes *what* to fetch for one entity type:
//! criteria, navigations to eagerly materialize, an ordering key, and an
//! optional paging window. It holds no connection and executes nothing, so
//! one value can be reused across any number of repository calls.
//!
//! Named queries are plain constructor functions returning a populated
//! specification:
//!
//! ```ignore
//! pub fn active_for_customer(customer_id: EntityId) -> Specification<Order> {
//!     Specification::new()
//!         .filter(Order::CUSTOMER_ID.eq(customer_id))
//!         .include(Order::ITEMS)
//!         .order_by_descending(Order::PLACED_AT)
//! }
//! ```

pub mod selector;

use serde::{Deserialize, Serialize};

pub use selector::{Field, Navigation};

use crate::types::filter::Filter;
use crate::types::pagination::PageRequest;

/// A query description over entity type `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Specification<T> {
    #[serde(default)]
    criteria: Option<Filter>,
    #[serde(default)]
    includes: Vec<Navigation<T>>,
    #[serde(default)]
    include_strings: Vec<String>,
    #[serde(default)]
    order_by: Option<Field<T>>,
    #[serde(default)]
    order_by_descending: Option<Field<T>>,
    #[serde(default)]
    skip: i64,
    #[serde(default)]
    take: i64,
    #[serde(default)]
    paging_enabled: bool,
}

impl<T> Specification<T> {
    /// A specification matching every entity, unordered and unpaged.
    pub fn new() -> Self {
        Self {
            criteria: None,
            includes: Vec::new(),
            include_strings: Vec::new(),
            order_by: None,
            order_by_descending: None,
            skip: 0,
            take: 0,
            paging_enabled: false,
        }
    }

    /// Add criteria. Repeated calls must all match.
    pub fn filter(mut self, criteria: Filter) -> Self {
        self.criteria = Some(match self.criteria.take() {
            Some(existing) => existing.and(criteria),
            None => criteria,
        });
        self
    }

    /// Eagerly materialize a navigation property.
    pub fn include(mut self, navigation: Navigation<T>) -> Self {
        self.includes.push(navigation);
        self
    }

    /// Eagerly materialize a dotted navigation path, e.g. `"items.product"`.
    pub fn include_path(mut self, path: impl Into<String>) -> Self {
        self.include_strings.push(path.into());
        self
    }

    /// Order ascending by `key`. Takes precedence over a descending key.
    pub fn order_by(mut self, key: Field<T>) -> Self {
        self.order_by = Some(key);
        self
    }

    /// Order descending by `key`.
    pub fn order_by_descending(mut self, key: Field<T>) -> Self {
        self.order_by_descending = Some(key);
        self
    }

    /// Enable paging: skip `skip` rows, then take `take` rows.
    pub fn paged(mut self, skip: i64, take: i64) -> Self {
        self.skip = skip;
        self.take = take;
        self.paging_enabled = true;
        self
    }

    /// Enable paging for a 1-based page request.
    pub fn page(self, request: PageRequest) -> Self {
        let skip = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let take = i64::try_from(request.limit()).unwrap_or(i64::MAX);
        self.paged(skip, take)
    }

    /// Disable paging, keeping the recorded skip/take values.
    pub fn unpaged(mut self) -> Self {
        self.paging_enabled = false;
        self
    }

    /// The criteria; `None` matches everything.
    pub fn criteria(&self) -> Option<&Filter> {
        self.criteria.as_ref()
    }

    /// Typed navigations to materialize, in declaration order.
    pub fn includes(&self) -> &[Navigation<T>] {
        &self.includes
    }

    /// Dotted navigation paths to materialize, in declaration order.
    pub fn include_strings(&self) -> &[String] {
        &self.include_strings
    }

    /// The ascending ordering key.
    pub fn ascending_key(&self) -> Option<&Field<T>> {
        self.order_by.as_ref()
    }

    /// The descending ordering key.
    pub fn descending_key(&self) -> Option<&Field<T>> {
        self.order_by_descending.as_ref()
    }

    /// Rows to skip when paging is enabled.
    pub fn skip(&self) -> i64 {
        self.skip
    }

    /// Rows to take when paging is enabled.
    pub fn take(&self) -> i64 {
        self.take
    }

    /// Whether the skip/take window applies.
    pub fn is_paging_enabled(&self) -> bool {
        self.paging_enabled
    }
}

impl<T> Default for Specification<T> {
    fn default() -> Self {
        Self::new()
    }
}
