//! Order domain entities.

pub mod item;
pub mod model;
pub mod specs;
pub mod status;

pub use item::OrderItem;
pub use model::Order;
pub use status::OrderStatus;
