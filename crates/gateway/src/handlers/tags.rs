//! Tag handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use super::paper_id;
use papernest_common::{
    db::{models::Tag, Repository},
    errors::{AppError, Result},
};

/// Request to tag a paper
#[derive(Debug, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// All tags, sorted by name
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    let repo = Repository::new(state.db.clone());
    Ok(Json(repo.all_tags().await?))
}

/// Tag a paper, creating the tag if needed. Returns the paper's tags.
pub async fn add_tag(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(request): Json<TagRequest>,
) -> Result<Json<Vec<Tag>>> {
    let request = TagRequest {
        name: request.name.trim().to_string(),
    };
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("name".to_string()),
    })?;

    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    if repo.find_paper_by_id(&id).await?.is_none() {
        return Err(AppError::PaperNotFound { id });
    }

    let tag = repo.get_or_create_tag(&request.name).await?;
    repo.tag_paper(&id, tag.id).await?;

    tracing::info!(paper_id = %id, tag = %tag.name, "Paper tagged");

    Ok(Json(repo.paper_tags(&id).await?))
}

/// Remove a tag from a paper. The tag itself is kept.
pub async fn remove_tag(
    State(state): State<AppState>,
    Path((raw_id, tag_id)): Path<(String, i32)>,
) -> Result<Json<Vec<Tag>>> {
    let id = paper_id(&raw_id)?;
    let repo = Repository::new(state.db.clone());

    repo.untag_paper(&id, tag_id).await?;

    Ok(Json(repo.paper_tags(&id).await?))
}
