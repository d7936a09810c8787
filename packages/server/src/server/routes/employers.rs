//! Employer trigger endpoints.
//!
//! GET /api/employers?per_page=N         - list every employer across pages
//! GET /api/update-employers?per_page=N  - run a full enrichment pass
//!
//! Both run to completion inside the request; a long pass is bounded only by
//! the caller's own timeout.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct PageSizeQuery {
    /// Overrides the configured page size
    per_page: Option<u32>,
}

impl PageSizeQuery {
    fn resolve(&self, default: u32) -> Result<u32, (StatusCode, Json<Value>)> {
        match self.per_page {
            Some(0) => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "per_page must be positive" })),
            )),
            Some(n) => Ok(n),
            None => Ok(default),
        }
    }
}

/// Run the reconciliation loop over every directory page.
pub async fn update_employers_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<PageSizeQuery>,
) -> (StatusCode, Json<Value>) {
    let page_size = match query.resolve(state.page_size) {
        Ok(n) => n,
        Err(rejection) => return rejection,
    };

    match state.reconciler.run_to_completion(page_size).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "message": "Employer data updated",
                "summary": summary,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Employer enrichment pass failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Error updating employer data",
                    "message": e.to_string(),
                })),
            )
        }
    }
}

/// Return all employers currently in the directory.
pub async fn list_employers_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<PageSizeQuery>,
) -> (StatusCode, Json<Value>) {
    let page_size = match query.resolve(state.page_size) {
        Ok(n) => n,
        Err(rejection) => return rejection,
    };

    match state.reconciler.deps().directory.fetch_all(page_size).await {
        Ok(employers) => (StatusCode::OK, Json(json!(employers))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list employers");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Error fetching employer data",
                    "message": e.to_string(),
                })),
            )
        }
    }
}
