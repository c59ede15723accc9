//! # quarry-core
//!
//! Core crate for Quarry. Contains the entity capability traits, the
//! [`Specification`] query description, the specification evaluator that
//! turns a specification into a composed [`Query`], the store and repository
//! contracts, configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Quarry crates and
//! never performs I/O itself.

pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod result;
pub mod specification;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use query::Query;
pub use result::AppResult;
pub use specification::{Field, Navigation, Specification};
pub use traits::{Collection, Entity, HasIdentity, Repository, Store};
pub use types::{EntityId, FieldValue, Filter};
