//! Personal library handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::AppState;
use super::{paper_id, papers::with_page_defaults};
use papernest_common::{
    db::{PaperPage, PaperView, Repository, SearchParams},
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct ReadStateResponse {
    pub paper_id: String,
    pub is_read: bool,
}

/// List saved papers; accepts the same filters as the paper listing
pub async fn list_library(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaperPage>> {
    let repo = Repository::new(state.db.clone());
    let params = SearchParams {
        in_library: true,
        ..with_page_defaults(params, &state.config.ui)
    };

    Ok(Json(repo.list_papers(&params).await?))
}

/// Save a paper to the library
pub async fn save_paper(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, Json<PaperView>)> {
    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    repo.save_to_library(&id).await?;

    let view = repo
        .find_paper_view(&id)
        .await?
        .ok_or(AppError::PaperNotFound { id: id.clone() })?;

    tracing::info!(paper_id = %id, "Paper saved to library");

    Ok((StatusCode::CREATED, Json(view)))
}

/// Remove a paper from the library
pub async fn remove_paper(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode> {
    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    if repo.remove_from_library(&id).await? {
        tracing::info!(paper_id = %id, "Paper removed from library");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Flip the read flag of a saved paper
pub async fn toggle_read(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ReadStateResponse>> {
    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    let is_read = repo.toggle_read(&id).await?;

    Ok(Json(ReadStateResponse { paper_id: id, is_read }))
}
