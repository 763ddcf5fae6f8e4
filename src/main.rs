// Content pages server - serves stored pages by alias and route

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use content_pages::{
    app_state::AppState,
    config::Config,
    error::AppResult,
    models::Page,
    services::{Renderer, ViewOutcome, ViewRequest},
};

/// Minimal HTML renderer standing in for a host templating engine.
struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, _view: &str, layout: &str, page: &Page, route: &str) -> AppResult<String> {
        let title = page.title.as_deref().unwrap_or(&page.name);
        let description = page
            .description
            .as_deref()
            .map(|d| format!("<meta name=\"description\" content=\"{}\">\n", d))
            .unwrap_or_default();
        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<title>{}</title>\n{}</head>\n\
             <body class=\"layout-{}\" data-route=\"{}\">\n{}\n</body>\n</html>\n",
            page.locale, title, description, layout, route, page.content
        ))
    }
}

#[derive(Deserialize)]
struct ViewParams {
    lang: Option<String>,
    draft: Option<bool>,
}

async fn view_page(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<ViewParams>,
    uri: Uri,
) -> AppResult<Response> {
    serve_page(state, path, params, uri).await
}

// The wildcard route never matches a bare "/", so the root path gets its
// own handler; redirects configured for the site root still apply.
async fn view_root(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    uri: Uri,
) -> AppResult<Response> {
    serve_page(state, String::new(), params, uri).await
}

async fn serve_page(
    state: AppState,
    path: String,
    params: ViewParams,
    uri: Uri,
) -> AppResult<Response> {
    // Trailing path segment is the page alias; the rest is the route.
    let alias = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string();

    let request = ViewRequest {
        alias,
        route: None,
        lang: params.lang,
        draft: params.draft.unwrap_or(false),
        request_url: uri.to_string(),
    };

    match state.resolver.view(&request).await? {
        ViewOutcome::Rendered(html) => Ok(Html(html).into_response()),
        ViewOutcome::Redirect(redirect) => Ok(if redirect.permanent {
            Redirect::permanent(&redirect.location).into_response()
        } else {
            Redirect::temporary(&redirect.location).into_response()
        }),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let address = config.server_address();

    // Initialize application state
    let app_state = AppState::new(config, Arc::new(HtmlRenderer)).await?;

    let app = Router::new()
        .route("/", get(view_root))
        .route("/{*path}", get(view_page))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state);

    info!("Content pages server starting on http://{}", address);
    let listener = TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
