//! SQL generation and parameter binding.

pub mod builder;
pub mod params;

pub use builder::{delete, insert, select_by_id, select_count, select_list, update, QueryBuf};
pub use params::PgBindValue;
