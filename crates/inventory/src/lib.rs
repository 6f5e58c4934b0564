mod category;
mod expiry;
mod lock;
mod log;
mod name;
mod reconciler;
mod unit;
mod view;

pub use category::*;
pub use expiry::*;
pub use lock::*;
pub use log::*;
pub use name::*;
pub use reconciler::*;
pub use unit::*;
pub use view::product_line;
