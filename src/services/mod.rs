//! Business logic services.

pub mod board;
pub mod order;

pub use board::BoardAggregator;
pub use order::OrderService;
