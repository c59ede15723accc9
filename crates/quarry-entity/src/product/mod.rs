//! Product catalog entities.

pub mod model;
pub mod specs;

pub use model::Product;
