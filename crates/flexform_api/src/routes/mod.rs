use axum::{routing::get, Router};

use crate::handlers::submission::{get_submission, list_submissions};
use crate::handlers::health_check;
use crate::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/submissions", get(list_submissions))
        .route("/submissions/:id", get(get_submission))
        .with_state(state)
}
