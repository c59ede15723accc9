//! Core type definitions used across the Quarry workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod sorting;
pub mod value;

pub use filter::{Filter, FilterField, FilterOp};
pub use id::EntityId;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
pub use value::FieldValue;
