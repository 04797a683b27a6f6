//! Atom feed decoding and conversion to paper records
//!
//! Decoding maps the arXiv Atom document onto a loose serde schema where
//! every entry field is optional. Conversion then validates each entry on its
//! own: a bad entry is reported and skipped, the rest of the batch survives.

use crate::errors::{EntryError, IngestionError};
use crate::identity::canonical_id;
use crate::text::normalize_whitespace;
use chrono::{DateTime, NaiveDateTime, Utc};
use papernest_common::db::models::PaperRecord;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

/// Decoded Atom feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
    #[serde(rename = "totalResults", default)]
    total_results: Option<OpenSearchValue>,

    #[serde(rename = "startIndex", default)]
    start_index: Option<OpenSearchValue>,

    #[serde(rename = "entry", default)]
    pub entries: Vec<FeedEntry>,
}

/// Text content of an OpenSearch pagination element
#[derive(Debug, Clone, Default, Deserialize)]
struct OpenSearchValue {
    #[serde(rename = "$value", default)]
    value: Option<String>,
}

impl OpenSearchValue {
    fn as_u64(&self) -> Option<u64> {
        self.value.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

/// One `<entry>` exactly as it appeared in the document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub published: Option<String>,

    #[serde(default)]
    pub updated: Option<String>,

    #[serde(rename = "author", default)]
    pub authors: Vec<FeedAuthor>,

    #[serde(rename = "category", default)]
    pub categories: Vec<FeedCategory>,

    #[serde(rename = "link", default)]
    pub links: Vec<FeedLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedCategory {
    #[serde(rename = "@term", default)]
    pub term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedLink {
    #[serde(rename = "@href", default)]
    pub href: String,

    #[serde(rename = "@rel", default)]
    pub rel: Option<String>,

    #[serde(rename = "@type", default)]
    pub link_type: Option<String>,

    #[serde(rename = "@title", default)]
    pub title: Option<String>,
}

/// Result of converting a whole feed
#[derive(Debug, Default)]
pub struct Conversion {
    pub papers: Vec<PaperRecord>,
    /// Entry position in the feed and why it was dropped
    pub skipped: Vec<(usize, EntryError)>,
}

impl Feed {
    /// Decode a raw API response body
    pub fn parse(body: &str) -> Result<Self, IngestionError> {
        ensure_feed_root(body)?;

        quick_xml::de::from_str(body)
            .map_err(|e| IngestionError::Decode(format!("Failed to decode Atom feed: {}", e)))
    }

    /// Total matches reported by the API, across all pages
    pub fn total_results(&self) -> Option<u64> {
        self.total_results.as_ref().and_then(OpenSearchValue::as_u64)
    }

    /// Offset of the first entry of this page
    pub fn start_index(&self) -> Option<u64> {
        self.start_index.as_ref().and_then(OpenSearchValue::as_u64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert every entry independently. Never fails as a whole.
    pub fn to_papers(&self) -> Conversion {
        let mut conversion = Conversion::default();

        for (index, entry) in self.entries.iter().enumerate() {
            match entry.to_paper() {
                Ok(paper) => conversion.papers.push(paper),
                Err(e) => conversion.skipped.push((index, e)),
            }
        }

        conversion
    }
}

impl FeedEntry {
    /// Validate and normalize this entry into a paper record
    pub fn to_paper(&self) -> Result<PaperRecord, EntryError> {
        let raw_id = self
            .id
            .as_deref()
            .ok_or(EntryError::MissingField { field: "id" })?;
        let id = canonical_id(raw_id)?;

        let published_at = parse_timestamp("published", self.published.as_deref())?;
        let updated_at = parse_timestamp("updated", self.updated.as_deref())?;

        let (pdf_url, arxiv_url) = self.distinguished_links();

        Ok(PaperRecord {
            id,
            title: normalize_whitespace(self.title.as_deref().unwrap_or_default()),
            abstract_text: normalize_whitespace(self.summary.as_deref().unwrap_or_default()),
            authors: self
                .authors
                .iter()
                .filter_map(|a| a.name.as_deref())
                .map(normalize_whitespace)
                .filter(|name| !name.is_empty())
                .collect(),
            categories: self
                .categories
                .iter()
                .map(|c| c.term.trim())
                .filter(|term| !term.is_empty())
                .map(str::to_string)
                .collect(),
            published_at,
            updated_at,
            pdf_url,
            arxiv_url,
        })
    }

    /// `(pdf_url, arxiv_url)` from a single pass; first match of each kind wins
    fn distinguished_links(&self) -> (String, String) {
        let mut pdf: Option<&str> = None;
        let mut alternate: Option<&str> = None;

        for link in &self.links {
            if pdf.is_none() && link.is_pdf() {
                pdf = Some(&link.href);
            } else if alternate.is_none() && link.rel.as_deref() == Some("alternate") {
                alternate = Some(&link.href);
            }

            if pdf.is_some() && alternate.is_some() {
                break;
            }
        }

        (
            pdf.unwrap_or_default().to_string(),
            alternate.unwrap_or_default().to_string(),
        )
    }
}

impl FeedLink {
    fn is_pdf(&self) -> bool {
        self.title.as_deref() == Some("pdf") || self.link_type.as_deref() == Some("application/pdf")
    }
}

/// Reject documents whose root element is not `<feed>`
fn ensure_feed_root(body: &str) -> Result<(), IngestionError> {
    let mut reader = Reader::from_str(body);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return if e.local_name().as_ref() == b"feed" {
                    Ok(())
                } else {
                    Err(IngestionError::Decode(format!(
                        "Expected <feed> root element, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )))
                };
            }
            Ok(Event::Text(t)) if !t.iter().all(u8::is_ascii_whitespace) => {
                return Err(IngestionError::Decode(
                    "Document is not XML: text before root element".to_string(),
                ));
            }
            Ok(Event::Eof) => {
                return Err(IngestionError::Decode("Document has no root element".to_string()));
            }
            Ok(_) => continue,
            Err(e) => {
                return Err(IngestionError::Decode(format!("Malformed XML: {}", e)));
            }
        }
    }
}

/// Parse an Atom timestamp. Formats are tried in order, first match wins.
fn parse_timestamp(field: &'static str, raw: Option<&str>) -> Result<DateTime<Utc>, EntryError> {
    let value = raw.map(str::trim).ok_or(EntryError::MissingField { field })?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ") {
        return Ok(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    // No offset at all: read as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    Err(EntryError::TimestampParse {
        field,
        value: value.to_string(),
    })
}
