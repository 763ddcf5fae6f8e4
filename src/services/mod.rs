// Request-scoped services built on top of the page store

pub mod page_resolver;

pub use page_resolver::{
    derive_route, LocaleMapping, PageResolver, Redirect, RedirectService, Renderer,
    TranslationProvider, ViewOutcome, ViewRequest,
};
