mod category;
mod transaction;

pub use category::{normalize_keyword, Category, DEFAULT_CATEGORY};
pub use transaction::{EntryType, Transaction};
