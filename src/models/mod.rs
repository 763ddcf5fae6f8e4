// Page entity and schema helpers

pub mod page;

pub use page::{parent_options, statuses_list, Page, PageStatus};
