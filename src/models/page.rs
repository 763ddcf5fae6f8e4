// Page entity - schema, validation rules and listing helpers

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Publication state of a page. Public resolution only ever serves
/// Published records; Draft is reachable through explicit preview requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageStatus {
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            PageStatus::Draft => 0,
            PageStatus::Published => 1,
        }
    }

    pub fn from_i64(value: i64) -> AppResult<Self> {
        match value {
            0 => Ok(PageStatus::Draft),
            1 => Ok(PageStatus::Published),
            other => Err(AppError::Internal(format!("Unknown page status: {}", other))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageStatus::Draft => "Draft",
            PageStatus::Published => "Published",
        }
    }
}

/// Row of the `pages` table.
///
/// `source_id` links locale variants of one logical page; it is only
/// consumed by external translation tooling and carries no referential
/// enforcement here. `route`, when set, pins the page to one path prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub source_id: Option<i64>,
    pub name: String,
    pub alias: String,
    pub content: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub in_sitemap: bool,
    pub in_turbo: bool,
    pub in_amp: bool,
    pub locale: String,
    pub status: PageStatus,
    pub route: Option<String>,
    pub layout: Option<String>,
    pub created_at: i64,
    pub created_by: Option<i64>,
    pub updated_at: i64,
    pub updated_by: Option<i64>,
}

impl Page {
    /// Minimal constructor for seeding and tests. Administrative create and
    /// update flows live outside this module.
    pub fn new(name: &str, alias: &str, content: &str, locale: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            parent_id: None,
            source_id: None,
            name: name.to_string(),
            alias: alias.to_string(),
            content: content.to_string(),
            title: None,
            description: None,
            keywords: None,
            in_sitemap: true,
            in_turbo: false,
            in_amp: false,
            locale: locale.to_string(),
            status: PageStatus::Published,
            route: None,
            layout: None,
            created_at: now,
            created_by: None,
            updated_at: now,
            updated_by: None,
        }
    }

    /// Validation rules for the page schema: name, alias, content and locale
    /// are required; name and alias are 3-128 characters; the SEO fields cap
    /// at 255 characters.
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("alias", &self.alias),
            ("content", &self.content),
            ("locale", &self.locale),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} cannot be blank", field)));
            }
        }

        for (field, value) in [("name", &self.name), ("alias", &self.alias)] {
            let len = value.chars().count();
            if !(3..=128).contains(&len) {
                return Err(AppError::Validation(format!(
                    "{} must be between 3 and 128 characters",
                    field
                )));
            }
        }

        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("keywords", &self.keywords),
        ] {
            if let Some(value) = value {
                if value.chars().count() > 255 {
                    return Err(AppError::Validation(format!(
                        "{} must be at most 255 characters",
                        field
                    )));
                }
            }
        }

        Ok(())
    }

    /// Public URL of this page: the stored route (or the module base route
    /// when none is set) followed by the alias.
    pub fn url(&self, base_route: &str) -> String {
        let prefix = self.route.as_deref().unwrap_or(base_route);
        format!("{}/{}", prefix.trim_end_matches('/'), self.alias)
    }
}

/// Status key/label pairs for selection widgets, optionally led by the
/// wildcard "all statuses" entry. Ordering is part of the contract.
pub fn statuses_list(all_statuses: bool) -> Vec<(String, String)> {
    let mut list = Vec::new();
    if all_statuses {
        list.push(("*".to_string(), "All statuses".to_string()));
    }
    list.push((
        PageStatus::Draft.as_i64().to_string(),
        PageStatus::Draft.label().to_string(),
    ));
    list.push((
        PageStatus::Published.as_i64().to_string(),
        PageStatus::Published.label().to_string(),
    ));
    list
}

/// Shapes store-provided parent candidates into id/name pairs for a
/// page-tree editor, optionally led by an "all pages" or "root page"
/// pseudo-entry.
pub fn parent_options(
    candidates: Vec<(i64, String)>,
    all_label: bool,
    root_label: bool,
) -> Vec<(String, String)> {
    let mut list = Vec::new();
    if all_label {
        list.push(("*".to_string(), "-- All pages --".to_string()));
    } else if root_label {
        list.push(("0".to_string(), "-- Root page --".to_string()));
    }
    list.extend(candidates.into_iter().map(|(id, name)| (id.to_string(), name)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_page() {
        let page = Page::new("About us", "about", "<p>Hello</p>", "en-US");
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        let mut page = Page::new("About us", "about", "<p>Hello</p>", "en-US");
        page.content = "   ".to_string();
        assert!(matches!(page.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_short_alias() {
        let page = Page::new("About us", "ab", "<p>Hello</p>", "en-US");
        assert!(matches!(page.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_seo_fields() {
        let mut page = Page::new("About us", "about", "<p>Hello</p>", "en-US");
        page.title = Some("x".repeat(256));
        assert!(matches!(page.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_statuses_list_ordering() {
        let list = statuses_list(true);
        assert_eq!(list[0].0, "*");
        assert_eq!(list[1].1, "Draft");
        assert_eq!(list[2].1, "Published");

        let list = statuses_list(false);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].1, "Draft");
    }

    #[test]
    fn test_url_prefers_stored_route() {
        let mut page = Page::new("Blog post", "hello", "<p>Hi</p>", "en-US");
        assert_eq!(page.url("/pages"), "/pages/hello");
        page.route = Some("/blog".to_string());
        assert_eq!(page.url("/pages"), "/blog/hello");
    }

    #[test]
    fn test_parent_options_labels() {
        let rows = vec![(7, "Docs".to_string())];
        let all = parent_options(rows.clone(), true, false);
        assert_eq!(all[0].0, "*");
        assert_eq!(all[1], ("7".to_string(), "Docs".to_string()));

        let root = parent_options(rows, false, true);
        assert_eq!(root[0], ("0".to_string(), "-- Root page --".to_string()));
    }
}
