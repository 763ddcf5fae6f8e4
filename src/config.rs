use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pages: PagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Module-level settings for page resolution. Passed explicitly into the
/// resolver instead of being read from ambient application state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Application source language, used for the second lookup pass when a
    /// request carries no explicit language.
    pub source_language: String,
    /// Concrete locales this installation serves, e.g. ["en-US", "fr-FR"].
    pub supported_locales: Vec<String>,
    /// Route prefix pages are served under by default.
    pub base_route: String,
    /// Layout used for rendering unless a page overrides it.
    pub base_layout: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/pages.db".to_string()),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            pages: PagesConfig {
                source_language: env::var("PAGES_SOURCE_LANGUAGE")
                    .unwrap_or_else(|_| "en-US".to_string()),
                supported_locales: env::var("PAGES_SUPPORT_LOCALES")
                    .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_else(|_| vec!["en-US".to_string()]),
                base_route: env::var("PAGES_BASE_ROUTE").unwrap_or_else(|_| "/pages".to_string()),
                base_layout: env::var("PAGES_BASE_LAYOUT")
                    .unwrap_or_else(|_| "main".to_string()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            source_language: "en-US".to_string(),
            supported_locales: vec!["en-US".to_string()],
            base_route: "/pages".to_string(),
            base_layout: "main".to_string(),
        }
    }
}
