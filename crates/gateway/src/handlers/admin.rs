//! Manual ingestion trigger

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::AppState;
use super::paper_id;
use papernest_common::errors::{AppError, Result};
use papernest_ingestion::{CycleReport, IngestionError};

#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    /// Comma-separated arXiv ids; the configured search runs when absent
    pub ids: Option<String>,
}

impl RefreshParams {
    /// Canonical ids in request order, duplicates dropped
    pub fn canonical_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = Vec::new();
        for raw in self
            .ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            let id = paper_id(raw)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

/// Fetch and store once, returning what happened
pub async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<CycleReport>> {
    let ids = params.canonical_ids()?;

    let result = if ids.is_empty() {
        state.pipeline.run_once().await
    } else {
        state.pipeline.refresh(&ids).await
    };

    let report = result.map_err(upstream_error)?;

    tracing::info!(
        stored = report.stored,
        failed = report.failed,
        "Manual refresh complete"
    );

    Ok(Json(report))
}

fn upstream_error(e: IngestionError) -> AppError {
    match e {
        IngestionError::Persistence(message) => AppError::Internal { message },
        IngestionError::Config(message) => AppError::Internal { message },
        other => AppError::Upstream {
            message: other.to_string(),
        },
    }
}
