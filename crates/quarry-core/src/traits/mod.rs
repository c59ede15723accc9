//! Core traits defined in `quarry-core` and implemented by other crates.

pub mod entity;
pub mod repository;
pub mod store;

pub use entity::{EntityDescriptor, Entity, HasIdentity, KEY_COLUMN, NavigationDef, NavigationKind};
pub use repository::Repository;
pub use store::{Change, ChangeSet, Collection, Store};
