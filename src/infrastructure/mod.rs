// Storage interface and SQLite implementation

pub mod page_store;
pub mod sqlite_store;

pub use page_store::{PageQuery, PageStore};
pub use sqlite_store::SqlitePageStore;
