use async_trait::async_trait;
use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};

use crate::error::{AppError, AppResult};
use crate::infrastructure::page_store::{PageQuery, PageStore};
use crate::models::{Page, PageStatus};

/// SQLite implementation of the page store.
pub struct SqlitePageStore {
    pool: SqlitePool,
}

impl SqlitePageStore {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = SqlitePool::connect(database_url).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to SQLite: {}", e))
        })?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// In-memory store for tests. A single pooled connection keeps every
    /// query on the same in-memory database.
    pub async fn new_in_memory() -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Create the pages table and its indexes. The unique index over
    /// (alias, route, status, locale) is what makes the composite lookup a
    /// single-row query.
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY,
                parent_id INTEGER,
                source_id INTEGER,
                name TEXT NOT NULL,
                alias TEXT NOT NULL,
                content TEXT NOT NULL,
                title TEXT,
                description TEXT,
                keywords TEXT,
                in_sitemap INTEGER NOT NULL DEFAULT 1,
                in_turbo INTEGER NOT NULL DEFAULT 0,
                in_amp INTEGER NOT NULL DEFAULT 0,
                locale TEXT NOT NULL,
                status INTEGER NOT NULL DEFAULT 0,
                route TEXT,
                layout TEXT,
                created_at INTEGER NOT NULL,
                created_by INTEGER,
                updated_at INTEGER NOT NULL,
                updated_by INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create pages table: {}", e)))?;

        // COALESCE keeps route-NULL rows unique too; SQLite treats plain
        // NULLs as pairwise distinct in a unique index.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_pages_lookup \
             ON pages(alias, COALESCE(route, ''), status, locale)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create lookup index: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pages_parent ON pages(parent_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create parent index: {}", e))
            })?;

        Ok(())
    }
}

fn row_to_page(row: &SqliteRow) -> AppResult<Page> {
    Ok(Page {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        source_id: row.get("source_id"),
        name: row.get("name"),
        alias: row.get("alias"),
        content: row.get("content"),
        title: row.get("title"),
        description: row.get("description"),
        keywords: row.get("keywords"),
        in_sitemap: row.get("in_sitemap"),
        in_turbo: row.get("in_turbo"),
        in_amp: row.get("in_amp"),
        locale: row.get("locale"),
        status: PageStatus::from_i64(row.get("status"))?,
        route: row.get("route"),
        layout: row.get("layout"),
        created_at: row.get("created_at"),
        created_by: row.get("created_by"),
        updated_at: row.get("updated_at"),
        updated_by: row.get("updated_by"),
    })
}

#[async_trait]
impl PageStore for SqlitePageStore {
    async fn find_one(&self, query: &PageQuery) -> AppResult<Option<Page>> {
        // NULL-route records serve under any path; an exact route match is
        // preferred when both exist.
        let row = if let Some(locale) = &query.locale {
            sqlx::query(
                "SELECT * FROM pages \
                 WHERE alias = ?1 AND (route = ?2 OR route IS NULL) \
                   AND status = ?3 AND locale = ?4 \
                 ORDER BY (route IS NULL), id LIMIT 1",
            )
            .bind(&query.alias)
            .bind(&query.route)
            .bind(query.status.as_i64())
            .bind(locale)
            .fetch_optional(&self.pool)
            .await
        } else {
            sqlx::query(
                "SELECT * FROM pages \
                 WHERE alias = ?1 AND (route = ?2 OR route IS NULL) \
                   AND status = ?3 \
                 ORDER BY (route IS NULL), id LIMIT 1",
            )
            .bind(&query.alias)
            .bind(&query.route)
            .bind(query.status.as_i64())
            .fetch_optional(&self.pool)
            .await
        }
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to find page '{}': {}", query.alias, e))
        })?;

        row.as_ref().map(row_to_page).transpose()
    }

    async fn parent_candidates(&self, page_id: Option<i64>) -> AppResult<Vec<(i64, String)>> {
        let rows = if let Some(id) = page_id {
            // Exclude the page itself, its direct children (parent_id = id)
            // and anything parented under those children. Root-level pages
            // always qualify.
            sqlx::query(
                "SELECT id, name FROM pages \
                 WHERE id != ?1 \
                   AND (parent_id IS NULL \
                        OR (parent_id != ?1 \
                            AND parent_id NOT IN (SELECT id FROM pages WHERE parent_id = ?1))) \
                 ORDER BY id",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query("SELECT id, name FROM pages ORDER BY id")
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to list parent candidates: {}", e))
        })?;

        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("name")))
            .collect())
    }

    async fn insert(&self, page: &Page) -> AppResult<Page> {
        page.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO pages (
                parent_id, source_id, name, alias, content,
                title, description, keywords,
                in_sitemap, in_turbo, in_amp,
                locale, status, route, layout,
                created_at, created_by, updated_at, updated_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
        )
        .bind(page.parent_id)
        .bind(page.source_id)
        .bind(&page.name)
        .bind(&page.alias)
        .bind(&page.content)
        .bind(&page.title)
        .bind(&page.description)
        .bind(&page.keywords)
        .bind(page.in_sitemap)
        .bind(page.in_turbo)
        .bind(page.in_amp)
        .bind(&page.locale)
        .bind(page.status.as_i64())
        .bind(&page.route)
        .bind(&page.layout)
        .bind(page.created_at)
        .bind(page.created_by)
        .bind(page.updated_at)
        .bind(page.updated_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to insert page '{}': {}", page.alias, e))
        })?;

        let mut saved = page.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }
}
