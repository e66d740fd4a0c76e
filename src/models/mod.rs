pub mod error;
pub mod order;

pub use error::OrderError;
pub use order::{Board, BoardType, Order, OrderAction};
