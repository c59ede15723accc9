//! Customer domain entities.

pub mod model;
pub mod specs;

pub use model::Customer;
