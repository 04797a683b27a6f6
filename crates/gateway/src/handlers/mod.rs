//! API handlers module

pub mod admin;
pub mod health;
pub mod library;
pub mod papers;
pub mod tags;

use papernest_common::errors::{AppError, Result};
use papernest_ingestion::identity::canonical_id;

/// Canonical paper id from a path segment. Versioned ids are accepted.
pub(crate) fn paper_id(raw: &str) -> Result<String> {
    canonical_id(raw).map_err(|e| AppError::InvalidFormat {
        message: e.to_string(),
    })
}
