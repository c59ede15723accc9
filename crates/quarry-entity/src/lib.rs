//! # quarry-entity
//!
//! Domain entity models for the Quarry order book. Every entity derives
//! `Debug`, `Clone`, `Serialize` and `Deserialize` and is registered with
//! [`quarry_core::entity!`], which supplies its identity and table metadata.
//!
//! Each module also exposes its named queries as constructor functions in a
//! `specs` submodule.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use order::{Order, OrderItem, OrderStatus};
pub use product::Product;
