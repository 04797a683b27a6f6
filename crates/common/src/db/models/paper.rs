//! Paper entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delimiter for author and category lists in storage and display
pub const LIST_DELIMITER: &str = ", ";

/// Flatten an ordered list into its stored form
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_DELIMITER)
}

/// Split a stored list back into its ordered items
pub fn split_list(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(LIST_DELIMITER).map(str::to_string).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "papers")]
pub struct Model {
    /// Canonical arXiv id, version suffix stripped
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_name = "abstract", column_type = "Text")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    #[sea_orm(column_type = "Text")]
    pub authors: String,

    #[sea_orm(column_type = "Text")]
    pub categories: String,

    pub published_at: DateTimeWithTimeZone,

    /// Last revision time reported by the source
    pub updated_at: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text")]
    pub pdf_url: String,

    #[sea_orm(column_type = "Text")]
    pub arxiv_url: String,

    /// First insertion time; never rewritten by upserts
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn author_list(&self) -> Vec<String> {
        split_list(&self.authors)
    }

    pub fn category_list(&self) -> Vec<String> {
        split_list(&self.categories)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::library_entry::Entity")]
    LibraryEntry,

    #[sea_orm(has_many = "super::paper_tag::Entity")]
    PaperTags,
}

impl Related<super::library_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryEntry.def()
    }
}

impl Related<super::paper_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaperTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical paper produced by feed conversion, before storage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pdf_url: String,
    pub arxiv_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_codec_preserves_order() {
        let authors = vec!["Jane Smith".to_string(), "John Doe".to_string()];
        let stored = join_list(&authors);
        assert_eq!(stored, "Jane Smith, John Doe");
        assert_eq!(split_list(&stored), authors);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_list("").is_empty());
        assert_eq!(join_list(&[]), "");
    }
}
