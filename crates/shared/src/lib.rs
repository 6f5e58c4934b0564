mod date;
mod error;
pub mod inventory;
pub mod log;
mod quantity;
pub mod shopping;

pub use date::*;
pub use error::*;
pub use inventory::{InventoryItem, ProductRow, ProductView};
pub use log::{LogAction, LogEntry, LogRow};
pub use quantity::*;
pub use shopping::{ShoppingItem, ShoppingRow, ShoppingView};
