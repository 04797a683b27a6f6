//! Canonical paper identifiers
//!
//! arXiv reports the same paper as a bare id (`2301.12345`), a versioned id
//! (`2301.12345v2`) or an abstract URL (`http://arxiv.org/abs/2301.12345v1`).
//! All of them resolve to the unversioned id.

use crate::errors::EntryError;
use regex_lite::Regex;
use std::sync::OnceLock;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{4}\.\d{4,5})(v\d+)?$").expect("id pattern is a valid regex")
    })
}

/// Extract the canonical identifier, dropping any version suffix
pub fn canonical_id(raw: &str) -> Result<String, EntryError> {
    id_pattern()
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| EntryError::MalformedIdentifier(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_version() {
        assert_eq!(canonical_id("http://arxiv.org/abs/2301.12345v1").unwrap(), "2301.12345");
        assert_eq!(canonical_id("http://arxiv.org/abs/2301.12345v2").unwrap(), "2301.12345");
    }

    #[test]
    fn test_bare_and_short_ids() {
        assert_eq!(canonical_id("2301.12345").unwrap(), "2301.12345");
        assert_eq!(canonical_id("0704.0001v13").unwrap(), "0704.0001");
        assert_eq!(canonical_id("  https://arxiv.org/abs/2401.00001 \n").unwrap(), "2401.00001");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            canonical_id("invalid"),
            Err(EntryError::MalformedIdentifier("invalid".to_string()))
        );
        assert!(canonical_id("").is_err());
        // Old-style ids and trailing junk are not canonical
        assert!(canonical_id("http://arxiv.org/abs/hep-th/9901001v1").is_err());
        assert!(canonical_id("2301.12345v1/extra").is_err());
    }
}
