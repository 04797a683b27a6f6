//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations:
//! paper upserts from ingestion, and the curation reads and writes
//! (library, tags, search) used by the gateway.

use crate::errors::{AppError, Result};
use crate::db::DbPool;
use crate::db::models::*;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of papers per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound on a requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page whose offset still fits a signed 64-bit SQL integer
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// Write side of paper storage as seen by ingestion
#[async_trait]
pub trait PaperStore: Send + Sync {
    /// Insert the paper or overwrite its source-owned fields
    async fn upsert_paper(&self, paper: &PaperRecord) -> Result<()>;
}

/// Sort key for paper listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSort {
    #[default]
    Published,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl From<SortDirection> for Order {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Filters and pagination for paper listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Substring over title, abstract and authors
    pub query: Option<String>,
    /// Substring over the stored category list
    pub category: Option<String>,
    /// Exact tag name
    pub tag: Option<String>,
    #[serde(default)]
    pub in_library: bool,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    #[serde(default)]
    pub sort_by: PaperSort,
    #[serde(default)]
    pub sort_order: SortDirection,
}

impl SearchParams {
    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A paper together with its curation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperView {
    #[serde(flatten)]
    pub paper: Paper,
    pub author_list: Vec<String>,
    pub category_list: Vec<String>,
    pub in_library: bool,
    pub is_read: bool,
    pub tags: Vec<Tag>,
}

/// One page of a paper listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperPage {
    pub papers: Vec<PaperView>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Paper Operations
    // ========================================================================

    /// Insert a paper, or overwrite every source-owned field of the existing row.
    ///
    /// Runs as one `INSERT .. ON CONFLICT(id) DO UPDATE` statement so readers
    /// never observe a partially written paper. `created_at` and curation rows
    /// are left alone.
    pub async fn upsert_paper(&self, paper: &PaperRecord) -> Result<()> {
        let now = chrono::Utc::now();

        let model = PaperActiveModel {
            id: Set(paper.id.clone()),
            title: Set(paper.title.clone()),
            abstract_text: Set(paper.abstract_text.clone()),
            authors: Set(join_list(&paper.authors)),
            categories: Set(join_list(&paper.categories)),
            published_at: Set(paper.published_at.into()),
            updated_at: Set(paper.updated_at.into()),
            pdf_url: Set(paper.pdf_url.clone()),
            arxiv_url: Set(paper.arxiv_url.clone()),
            created_at: Set(now.into()),
        };

        PaperEntity::insert(model)
            .on_conflict(
                OnConflict::column(PaperColumn::Id)
                    .update_columns([
                        PaperColumn::Title,
                        PaperColumn::AbstractText,
                        PaperColumn::Authors,
                        PaperColumn::Categories,
                        PaperColumn::PublishedAt,
                        PaperColumn::UpdatedAt,
                        PaperColumn::PdfUrl,
                        PaperColumn::ArxivUrl,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn())
            .await?;

        Ok(())
    }

    /// Find paper by canonical ID
    pub async fn find_paper_by_id(&self, id: &str) -> Result<Option<Paper>> {
        PaperEntity::find_by_id(id.to_string())
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Paper detail with library state and tags
    pub async fn find_paper_view(&self, id: &str) -> Result<Option<PaperView>> {
        let Some(paper) = self.find_paper_by_id(id).await? else {
            return Ok(None);
        };

        Ok(self.attach_curation(vec![paper]).await?.pop())
    }

    /// List papers matching the filters, newest first by default
    pub async fn list_papers(&self, params: &SearchParams) -> Result<PaperPage> {
        let mut select = PaperEntity::find();

        if let Some(query) = non_blank(&params.query) {
            select = select.filter(
                Condition::any()
                    .add(PaperColumn::Title.contains(query))
                    .add(PaperColumn::AbstractText.contains(query))
                    .add(PaperColumn::Authors.contains(query)),
            );
        }

        if let Some(category) = non_blank(&params.category) {
            select = select.filter(PaperColumn::Categories.contains(category));
        }

        if params.in_library {
            select = select.filter(
                PaperColumn::Id.in_subquery(
                    Query::select()
                        .column(LibraryColumn::PaperId)
                        .from(LibraryEntity)
                        .to_owned(),
                ),
            );
        }

        if let Some(tag) = non_blank(&params.tag) {
            select = select.filter(
                PaperColumn::Id.in_subquery(
                    Query::select()
                        .column((PaperTagEntity, PaperTagColumn::PaperId))
                        .from(PaperTagEntity)
                        .inner_join(
                            TagEntity,
                            Expr::col((TagEntity, TagColumn::Id))
                                .equals((PaperTagEntity, PaperTagColumn::TagId)),
                        )
                        .and_where(Expr::col((TagEntity, TagColumn::Name)).eq(tag))
                        .to_owned(),
                ),
            );
        }

        let sort_column = match params.sort_by {
            PaperSort::Published => PaperColumn::PublishedAt,
            PaperSort::Title => PaperColumn::Title,
        };

        // Stable pages when the sort key ties
        let select = select
            .order_by(sort_column, params.sort_order.into())
            .order_by_asc(PaperColumn::Id);

        let page = params.page();
        let page_size = params.page_size();
        let paginator = select.paginate(self.conn(), page_size);
        let total = paginator.num_items().await?;
        let papers = paginator.fetch_page(page - 1).await?;

        Ok(PaperPage {
            papers: self.attach_curation(papers).await?,
            total,
            page,
            page_size,
        })
    }

    /// Total number of stored papers
    pub async fn paper_count(&self) -> Result<u64> {
        PaperEntity::find()
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn attach_curation(&self, papers: Vec<Paper>) -> Result<Vec<PaperView>> {
        if papers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = papers.iter().map(|p| p.id.clone()).collect();

        let library: HashMap<String, bool> = LibraryEntity::find()
            .filter(LibraryColumn::PaperId.is_in(ids.clone()))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|entry| (entry.paper_id, entry.is_read))
            .collect();

        let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
        let links = PaperTagEntity::find()
            .filter(PaperTagColumn::PaperId.is_in(ids))
            .find_also_related(TagEntity)
            .all(self.conn())
            .await?;
        for (link, tag) in links {
            if let Some(tag) = tag {
                tags.entry(link.paper_id).or_default().push(tag);
            }
        }

        Ok(papers
            .into_iter()
            .map(|paper| {
                let mut paper_tags = tags.remove(&paper.id).unwrap_or_default();
                paper_tags.sort_by(|a, b| a.name.cmp(&b.name));
                let is_read = library.get(&paper.id).copied();

                PaperView {
                    author_list: paper.author_list(),
                    category_list: paper.category_list(),
                    in_library: is_read.is_some(),
                    is_read: is_read.unwrap_or(false),
                    tags: paper_tags,
                    paper,
                }
            })
            .collect())
    }

    // ========================================================================
    // Library Operations
    // ========================================================================

    /// Save a paper to the library. Saving twice keeps the first entry.
    pub async fn save_to_library(&self, paper_id: &str) -> Result<()> {
        if self.find_paper_by_id(paper_id).await?.is_none() {
            return Err(AppError::PaperNotFound { id: paper_id.to_string() });
        }

        let entry = LibraryActiveModel {
            paper_id: Set(paper_id.to_string()),
            is_read: Set(false),
            saved_at: Set(chrono::Utc::now().into()),
        };

        LibraryEntity::insert(entry)
            .on_conflict(OnConflict::column(LibraryColumn::PaperId).do_nothing().to_owned())
            .exec_without_returning(self.conn())
            .await?;

        Ok(())
    }

    /// Remove a paper from the library. Returns whether an entry existed.
    pub async fn remove_from_library(&self, paper_id: &str) -> Result<bool> {
        let result = LibraryEntity::delete_by_id(paper_id.to_string())
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Flip the read flag of a saved paper and return the new value
    pub async fn toggle_read(&self, paper_id: &str) -> Result<bool> {
        let result = LibraryEntity::update_many()
            .col_expr(LibraryColumn::IsRead, Expr::col(LibraryColumn::IsRead).not())
            .filter(LibraryColumn::PaperId.eq(paper_id))
            .exec(self.conn())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotInLibrary { id: paper_id.to_string() });
        }

        let entry = LibraryEntity::find_by_id(paper_id.to_string())
            .one(self.conn())
            .await?
            .ok_or_else(|| AppError::NotInLibrary { id: paper_id.to_string() })?;

        Ok(entry.is_read)
    }

    /// Number of saved papers
    pub async fn library_count(&self) -> Result<u64> {
        LibraryEntity::find()
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Tag Operations
    // ========================================================================

    /// Get the tag with this name, creating it first if needed
    pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                message: "Tag name must not be empty".to_string(),
                field: Some("name".to_string()),
            });
        }

        let tag = TagActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        TagEntity::insert(tag)
            .on_conflict(OnConflict::column(TagColumn::Name).do_nothing().to_owned())
            .exec_without_returning(self.conn())
            .await?;

        TagEntity::find()
            .filter(TagColumn::Name.eq(name))
            .one(self.conn())
            .await?
            .ok_or_else(|| AppError::Internal {
                message: format!("Tag '{}' missing after insert", name),
            })
    }

    /// Attach a tag to a paper. Attaching twice is a no-op.
    pub async fn tag_paper(&self, paper_id: &str, tag_id: i32) -> Result<()> {
        if self.find_paper_by_id(paper_id).await?.is_none() {
            return Err(AppError::PaperNotFound { id: paper_id.to_string() });
        }

        let link = PaperTagActiveModel {
            paper_id: Set(paper_id.to_string()),
            tag_id: Set(tag_id),
        };

        PaperTagEntity::insert(link)
            .on_conflict(
                OnConflict::columns([PaperTagColumn::PaperId, PaperTagColumn::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn())
            .await?;

        Ok(())
    }

    /// Detach a tag from a paper. The tag itself is kept.
    pub async fn untag_paper(&self, paper_id: &str, tag_id: i32) -> Result<bool> {
        let result = PaperTagEntity::delete_by_id((paper_id.to_string(), tag_id))
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Tags of one paper, sorted by name
    pub async fn paper_tags(&self, paper_id: &str) -> Result<Vec<Tag>> {
        TagEntity::find()
            .inner_join(PaperTagEntity)
            .filter(PaperTagColumn::PaperId.eq(paper_id))
            .order_by_asc(TagColumn::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Every tag, sorted by name
    pub async fn all_tags(&self) -> Result<Vec<Tag>> {
        TagEntity::find()
            .order_by_asc(TagColumn::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl PaperStore for Repository {
    async fn upsert_paper(&self, paper: &PaperRecord) -> Result<()> {
        Repository::upsert_paper(self, paper).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    async fn repo() -> Repository {
        let pool = DbPool::connect_and_migrate(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        Repository::new(pool)
    }

    fn record(id: &str, title: &str) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: format!("Abstract of {}", title),
            authors: vec!["Jane Smith".to_string(), "John Doe".to_string()],
            categories: vec!["cs.AI".to_string(), "cs.LG".to_string()],
            published_at: Utc.with_ymd_and_hms(2023, 1, 29, 18, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2023, 1, 30, 9, 30, 0).unwrap(),
            pdf_url: format!("http://arxiv.org/pdf/{}v1", id),
            arxiv_url: format!("http://arxiv.org/abs/{}v1", id),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_with_flattened_lists() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Test Paper")).await.unwrap();

        let paper = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();
        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, "Jane Smith, John Doe");
        assert_eq!(paper.categories, "cs.AI, cs.LG");
        assert_eq!(paper.published_at, Utc.with_ymd_and_hms(2023, 1, 29, 18, 0, 0).unwrap());
        assert_eq!(repo.paper_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_updates_fields_and_keeps_created_at() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Original")).await.unwrap();
        let before = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();

        let mut changed = record("2301.12345", "Revised");
        changed.authors.push("Ada Lovelace".to_string());
        repo.upsert_paper(&changed).await.unwrap();

        let after = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();
        assert_eq!(after.title, "Revised");
        assert_eq!(after.author_list().len(), 3);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(repo.paper_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_identical_upsert_is_noop() {
        let repo = repo().await;
        let paper = record("2301.12345", "Stable");
        repo.upsert_paper(&paper).await.unwrap();
        let first = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();

        repo.upsert_paper(&paper).await.unwrap();
        let second = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.paper_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_preserves_curation() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Saved")).await.unwrap();
        repo.save_to_library("2301.12345").await.unwrap();
        assert!(repo.toggle_read("2301.12345").await.unwrap());
        let tag = repo.get_or_create_tag("ml").await.unwrap();
        repo.tag_paper("2301.12345", tag.id).await.unwrap();

        repo.upsert_paper(&record("2301.12345", "Saved, revised")).await.unwrap();

        let view = repo.find_paper_view("2301.12345").await.unwrap().unwrap();
        assert_eq!(view.paper.title, "Saved, revised");
        assert!(view.in_library);
        assert!(view.is_read);
        assert_eq!(view.tags, vec![tag]);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_converge() {
        let repo = Arc::new(repo().await);

        let writes = (0..8).map(|i| {
            let repo = Arc::clone(&repo);
            async move {
                repo.upsert_paper(&record("2301.12345", &format!("Title {}", i)))
                    .await
            }
        });
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        let paper = repo.find_paper_by_id("2301.12345").await.unwrap().unwrap();
        assert!(paper.title.starts_with("Title "));
        assert_eq!(repo.paper_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_library_save_is_idempotent() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Saved")).await.unwrap();

        repo.save_to_library("2301.12345").await.unwrap();
        repo.toggle_read("2301.12345").await.unwrap();
        repo.save_to_library("2301.12345").await.unwrap();

        assert_eq!(repo.library_count().await.unwrap(), 1);
        let view = repo.find_paper_view("2301.12345").await.unwrap().unwrap();
        assert!(view.is_read);
    }

    #[tokio::test]
    async fn test_library_requires_known_paper() {
        let repo = repo().await;
        let err = tokio_test::assert_err!(repo.save_to_library("9999.99999").await);
        assert!(matches!(err, AppError::PaperNotFound { .. }));

        let err = tokio_test::assert_err!(repo.toggle_read("9999.99999").await);
        assert!(matches!(err, AppError::NotInLibrary { .. }));
    }

    #[tokio::test]
    async fn test_toggle_and_remove() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Saved")).await.unwrap();
        repo.save_to_library("2301.12345").await.unwrap();

        assert!(repo.toggle_read("2301.12345").await.unwrap());
        assert!(!repo.toggle_read("2301.12345").await.unwrap());

        assert!(repo.remove_from_library("2301.12345").await.unwrap());
        assert!(!repo.remove_from_library("2301.12345").await.unwrap());
        assert_eq!(repo.library_count().await.unwrap(), 0);
        assert_eq!(repo.paper_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tags_get_or_create_and_untag() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.12345", "Tagged")).await.unwrap();

        let first = repo.get_or_create_tag("  nlp ").await.unwrap();
        let again = repo.get_or_create_tag("nlp").await.unwrap();
        assert_eq!(first, again);
        assert_eq!(first.name, "nlp");

        let other = repo.get_or_create_tag("agents").await.unwrap();
        repo.tag_paper("2301.12345", first.id).await.unwrap();
        repo.tag_paper("2301.12345", first.id).await.unwrap();
        repo.tag_paper("2301.12345", other.id).await.unwrap();

        let names: Vec<_> = repo
            .paper_tags("2301.12345")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["agents", "nlp"]);

        assert!(repo.untag_paper("2301.12345", first.id).await.unwrap());
        assert_eq!(repo.paper_tags("2301.12345").await.unwrap(), vec![other]);
        // Untagging never deletes the tag
        assert_eq!(repo.all_tags().await.unwrap().len(), 2);

        let err = repo.get_or_create_tag("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let repo = repo().await;
        for (i, id) in ["2301.00001", "2301.00002", "2301.00003"].iter().enumerate() {
            let mut paper = record(id, &format!("Paper {}", i));
            paper.published_at = Utc.with_ymd_and_hms(2023, 1, 1 + i as u32, 0, 0, 0).unwrap();
            repo.upsert_paper(&paper).await.unwrap();
        }
        let mut transformers = record("2301.00004", "Attention Is All You Need");
        transformers.categories = vec!["cs.CL".to_string()];
        transformers.published_at = Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap();
        repo.upsert_paper(&transformers).await.unwrap();

        // Newest first by default
        let page = repo.list_papers(&SearchParams::default()).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.papers[0].paper.id, "2301.00003");
        assert_eq!(page.papers[3].paper.id, "2301.00004");

        let page = repo
            .list_papers(&SearchParams {
                query: Some("attention".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.papers[0].author_list, vec!["Jane Smith", "John Doe"]);

        let page = repo
            .list_papers(&SearchParams {
                category: Some("cs.CL".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = repo
            .list_papers(&SearchParams {
                page: Some(2),
                page_size: Some(3),
                sort_by: PaperSort::Title,
                sort_order: SortDirection::Asc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.papers.len(), 1);
        assert_eq!(page.papers[0].paper.title, "Paper 2");

        repo.save_to_library("2301.00002").await.unwrap();
        let tag = repo.get_or_create_tag("reading-group").await.unwrap();
        repo.tag_paper("2301.00001", tag.id).await.unwrap();

        let page = repo
            .list_papers(&SearchParams {
                in_library: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.papers[0].in_library);

        let page = repo
            .list_papers(&SearchParams {
                tag: Some("reading-group".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.papers[0].paper.id, "2301.00001");
        assert_eq!(page.papers[0].tags, vec![tag]);
    }

    #[test]
    fn test_search_params_bounds() {
        let params = SearchParams {
            page: Some(0),
            page_size: Some(1_000),
            ..Default::default()
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);
        assert_eq!(SearchParams::default().page_size(), DEFAULT_PAGE_SIZE);

        let params = SearchParams {
            page: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(params.page(), MAX_PAGE);
    }

    #[tokio::test]
    async fn test_huge_page_number_is_empty() {
        let repo = repo().await;
        repo.upsert_paper(&record("2301.00001", "Only paper")).await.unwrap();

        let page = repo
            .list_papers(&SearchParams {
                page: Some(u64::MAX),
                page_size: Some(MAX_PAGE_SIZE),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert!(page.papers.is_empty());
        assert_eq!(page.page, MAX_PAGE);
    }
}
