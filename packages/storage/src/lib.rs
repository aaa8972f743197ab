// ABOUTME: SQLite storage layers for Procura
// ABOUTME: One storage struct per entity plus the shared DbState aggregate

pub mod categories;
pub mod db;
pub mod error;
pub mod quotes;
pub mod rfps;
pub mod users;
pub mod vendors;

// Re-export main types
pub use categories::CategoryStorage;
pub use db::DbState;
pub use error::{StorageError, StorageResult};
pub use quotes::QuoteStorage;
pub use rfps::RfpStorage;
pub use users::UserStorage;
pub use vendors::VendorStorage;
