use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use flexform_core::models::SubmissionRecord;
use flexform_store::{Filter, StoreError};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub department: Option<String>,
    pub limit: Option<u32>,
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionRecord>, (StatusCode, String)> {
    match state.store.select_one(id).await {
        Ok(record) => Ok(Json(record)),
        Err(StoreError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            format!("Submission not found: {}", id),
        )),
        Err(e) => {
            tracing::error!("Failed to fetch submission {}: {:?}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ))
        }
    }
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SubmissionRecord>>, (StatusCode, String)> {
    let mut filter = Filter::new();
    if let Some(department) = params.department {
        filter = filter.eq("department", department);
    }
    // The dashboard re-queries on every refresh; cap the page regardless.
    filter = filter.limit(params.limit.unwrap_or(200));

    match state.store.select_all(&filter).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("Failed to list submissions: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ))
        }
    }
}
