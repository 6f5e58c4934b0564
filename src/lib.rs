pub mod assistant;
pub mod config;
pub mod db;
pub mod intent;
pub mod llm;
pub mod observability;

pub use db::create_pool;
