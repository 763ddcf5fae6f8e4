// Storage seam for page records

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Page, PageStatus};

/// Composite lookup key for the single-row page query. The storage layer
/// keeps (alias, route, status, locale) unique, so a query matches at most
/// one stored route variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub alias: String,
    pub route: String,
    pub status: PageStatus,
    pub locale: Option<String>,
}

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Single-row lookup by composite key. Records with no stored route
    /// match any requested route; an exact route match wins over them.
    async fn find_one(&self, query: &PageQuery) -> AppResult<Option<Page>>;

    /// id/name pairs of pages eligible to become the given page's parent.
    /// Excludes the page itself and its direct children; with no page id,
    /// every page qualifies. Advisory only, not a stored constraint.
    async fn parent_candidates(&self, page_id: Option<i64>) -> AppResult<Vec<(i64, String)>>;

    /// Persist a new page and return it with its assigned id. Used by
    /// seeding and tests; the administrative surface is out of scope.
    async fn insert(&self, page: &Page) -> AppResult<Page>;
}
