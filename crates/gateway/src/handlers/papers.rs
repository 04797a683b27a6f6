//! Paper listing and detail handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::AppState;
use super::paper_id;
use papernest_common::{
    config::UiConfig,
    db::{PaperPage, PaperView, Repository, SearchParams},
    errors::{AppError, Result},
};

/// Response for the stats endpoint
#[derive(Serialize)]
pub struct StatsResponse {
    pub papers: u64,
    pub library: u64,
}

/// Apply the configured default and ceiling to the requested page size
pub(crate) fn with_page_defaults(mut params: SearchParams, ui: &UiConfig) -> SearchParams {
    let size = params.page_size.unwrap_or(ui.page_size);
    params.page_size = Some(size.min(ui.max_page_size));
    params
}

/// List or search papers
pub async fn list_papers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaperPage>> {
    let repo = Repository::new(state.db.clone());
    let params = with_page_defaults(params, &state.config.ui);

    let page = repo.list_papers(&params).await?;

    tracing::debug!(
        total = page.total,
        page = page.page,
        returned = page.papers.len(),
        "Listed papers"
    );

    Ok(Json(page))
}

/// Get a paper by ID with its library state and tags
pub async fn get_paper(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PaperView>> {
    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    let view = repo
        .find_paper_view(&id)
        .await?
        .ok_or(AppError::PaperNotFound { id })?;

    Ok(Json(view))
}

/// Paper and library counts
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let repo = Repository::new(state.db.clone());

    Ok(Json(StatsResponse {
        papers: repo.paper_count().await?,
        library: repo.library_count().await?,
    }))
}
