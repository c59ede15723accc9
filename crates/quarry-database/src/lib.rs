//! # quarry-database
//!
//! Store backends for Quarry and the generic repository that runs
//! specifications against them.
//!
//! - [`MemoryStore`] keeps per-entity tables in process memory.
//! - [`PgStore`] translates composed queries to PostgreSQL through sqlx.
//! - [`StoreRepository`] implements the
//!   [`Repository`](quarry_core::traits::Repository) contract over any
//!   [`Store`](quarry_core::traits::Store).

pub mod error;
pub mod repository;
pub mod store;

pub use repository::StoreRepository;
pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::{AnyStore, open_store};
