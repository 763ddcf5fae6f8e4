// Content pages module - alias/route/locale resolution over a page store

// Page entity and schema helpers
pub mod models;

// Storage interface and SQLite implementation
pub mod infrastructure;

// Page resolution service and collaborator seams
pub mod services;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
