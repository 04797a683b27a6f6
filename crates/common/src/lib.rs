//! PaperNest Common Library
//!
//! Shared code for the PaperNest services including:
//! - Database models, schema bootstrap and repository
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use db::{DbPool, PaperStore, Repository};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
