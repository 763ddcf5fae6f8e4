// PageResolver - maps an inbound request (alias, route, language, draft
// flag) to exactly one page record and hands it to the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::config::PagesConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{PageQuery, PageStore};
use crate::models::{Page, PageStatus};

const PAGE_NOT_FOUND: &str = "The requested page does not exist.";

/// Splits a request URL into a slash-delimited prefix and a trailing
/// alias-like segment. Best-effort heuristic, not a general URL parser.
static ROUTE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:/+[A-Za-z0-9_/\-]+/)*)([A-Za-z0-9_\-]*)").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub location: String,
    pub permanent: bool,
}

/// Configured-redirect lookup consulted before any page resolution.
pub trait RedirectService: Send + Sync {
    fn check(&self, url: &str) -> Option<Redirect>;
}

/// URL language code paired with the concrete locale it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleMapping {
    pub url: String,
    pub locale: String,
}

/// Translation subsystem seam. When absent, locale resolution falls back to
/// scanning the module's configured locale list.
pub trait TranslationProvider: Send + Sync {
    fn locales(&self) -> Vec<LocaleMapping>;
    fn default_lang(&self) -> Option<String>;
    /// Whether the default language is hidden from URLs. Only then does the
    /// provider's default language replace the application source language.
    fn hide_default_lang(&self) -> bool;
}

/// Rendering seam; the host templating engine implements this.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, layout: &str, page: &Page, route: &str) -> AppResult<String>;
}

#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub alias: String,
    pub route: Option<String>,
    pub lang: Option<String>,
    pub draft: bool,
    /// Full request URL as received, used for redirect checks and route
    /// derivation when no explicit route is supplied.
    pub request_url: String,
}

#[derive(Debug)]
pub enum ViewOutcome {
    Rendered(String),
    Redirect(Redirect),
}

pub struct PageResolver {
    store: Arc<dyn PageStore>,
    config: PagesConfig,
    renderer: Arc<dyn Renderer>,
    redirects: Option<Arc<dyn RedirectService>>,
    translations: Option<Arc<dyn TranslationProvider>>,
}

impl PageResolver {
    pub fn new(store: Arc<dyn PageStore>, config: PagesConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            store,
            config,
            renderer,
            redirects: None,
            translations: None,
        }
    }

    pub fn with_redirects(mut self, redirects: Arc<dyn RedirectService>) -> Self {
        self.redirects = Some(redirects);
        self
    }

    pub fn with_translations(mut self, translations: Arc<dyn TranslationProvider>) -> Self {
        self.translations = Some(translations);
        self
    }

    /// View operation: redirect short-circuit, then resolution, then layout
    /// selection and rendering.
    pub async fn view(&self, request: &ViewRequest) -> AppResult<ViewOutcome> {
        if let Some(redirects) = &self.redirects {
            if let Some(redirect) = redirects.check(&request.request_url) {
                debug!("Redirecting {} to {}", request.request_url, redirect.location);
                return Ok(ViewOutcome::Redirect(redirect));
            }
        }

        let (page, route) = self.resolve(request).await?;

        let layout = page
            .layout
            .clone()
            .unwrap_or_else(|| self.config.base_layout.clone());
        let html = self.renderer.render("index", &layout, &page, &route)?;
        Ok(ViewOutcome::Rendered(html))
    }

    /// Resolve the request to a page record and the computed route.
    ///
    /// If the record carries a stored route that differs from the computed
    /// request route, the request fails as not-found even though alias and
    /// locale matched.
    pub async fn resolve(&self, request: &ViewRequest) -> AppResult<(Page, String)> {
        let route = derive_route(
            &request.alias,
            request.route.as_deref(),
            &request.request_url,
        );

        let mut model = self
            .find_model(&request.alias, &route, request.lang.as_deref(), request.draft)
            .await?;

        // Second pass with the default language, strictly gated on the
        // request carrying no explicit language.
        if model.is_none() && request.lang.is_none() {
            let default_lang = self.default_lang();
            model = self
                .find_model(&request.alias, &route, Some(default_lang.as_str()), request.draft)
                .await?;
        }

        let model = model.ok_or_else(|| AppError::NotFound(PAGE_NOT_FOUND.to_string()))?;

        if let Some(stored_route) = &model.route {
            if stored_route != &route {
                debug!(
                    "Page '{}' pinned to route {} but requested via {}",
                    model.alias, stored_route, route
                );
                return Err(AppError::NotFound(PAGE_NOT_FOUND.to_string()));
            }
        }

        Ok((model, route))
    }

    /// Locale-aware single-record lookup.
    ///
    /// An explicit language that resolves to no known locale fails the
    /// lookup for public requests; draft previews skip both the gate and the
    /// locale filter.
    pub async fn find_model(
        &self,
        alias: &str,
        route: &str,
        lang: Option<&str>,
        draft: bool,
    ) -> AppResult<Option<Page>> {
        let locale = match lang {
            Some(lang) => self.resolve_locale(lang),
            None => None,
        };

        if !draft && lang.is_some() && locale.is_none() {
            debug!("No locale configured for language '{}'", lang.unwrap_or_default());
            return Ok(None);
        }

        let query = if draft {
            PageQuery {
                alias: alias.to_string(),
                route: route.to_string(),
                status: PageStatus::Draft,
                locale: None,
            }
        } else {
            PageQuery {
                alias: alias.to_string(),
                route: route.to_string(),
                status: PageStatus::Published,
                locale,
            }
        };

        self.store.find_one(&query).await
    }

    /// Map a URL language code to a concrete locale: through the translation
    /// provider when present, otherwise by scanning the configured locale
    /// list for a matching primary language subtag.
    fn resolve_locale(&self, lang: &str) -> Option<String> {
        if let Some(translations) = &self.translations {
            return translations
                .locales()
                .into_iter()
                .find(|mapping| mapping.url == lang)
                .map(|mapping| mapping.locale);
        }

        self.config
            .supported_locales
            .iter()
            .find(|locale| primary_language(locale) == lang)
            .cloned()
    }

    /// Language used for the second lookup pass: the translation provider's
    /// default language when it hides the default from URLs, otherwise the
    /// application source language's primary subtag.
    fn default_lang(&self) -> String {
        if let Some(translations) = &self.translations {
            if translations.hide_default_lang() {
                if let Some(lang) = translations.default_lang() {
                    return lang;
                }
            }
        }
        primary_language(&self.config.source_language).to_string()
    }
}

/// Primary language subtag of a locale identifier: "en-US" -> "en".
fn primary_language(locale: &str) -> &str {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
}

/// Compute the canonical route for a request.
///
/// With no explicit route, the request URL is split into a path prefix and a
/// trailing segment; the prefix becomes the route only when the trailing
/// segment equals the requested alias. An explicit route is cleaned of empty
/// segments and prefixed with `/`. An empty result means the root route.
pub fn derive_route(alias: &str, explicit: Option<&str>, request_url: &str) -> String {
    let route = match explicit {
        None => ROUTE_SPLIT.captures(request_url).and_then(|captures| {
            let prefix = captures.get(1).map_or("", |m| m.as_str());
            let trailing = captures.get(2).map_or("", |m| m.as_str());
            if trailing == alias {
                Some(prefix.trim_end_matches('/').to_string())
            } else {
                None
            }
        }),
        Some(explicit) => Some(normalize_route(explicit)),
    };

    match route {
        Some(route) if !route.is_empty() => route,
        _ => "/".to_string(),
    }
}

/// Collapse duplicate and trailing slashes and anchor with a leading slash.
fn normalize_route(route: &str) -> String {
    let cleaned: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    if cleaned.is_empty() {
        String::new()
    } else {
        format!("/{}", cleaned.join("/"))
    }
}
