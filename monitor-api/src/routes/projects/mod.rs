mod overview;
mod reports;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, domain::models::Quarter};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(overview::list_projects))
        .route("/overdue", get(overview::list_overdue_projects))
        .route("/:project_id", get(overview::get_project))
        .route("/:project_id/status", post(overview::update_status))
        .route(
            "/:project_id/reports/:quarter/submit",
            post(reports::submit_report),
        )
        .route(
            "/:project_id/reports/:quarter/verify",
            post(reports::verify_report),
        )
        .route(
            "/:project_id/reports/:quarter/comments",
            post(reports::add_comment),
        )
}

/// Accepts `q2_report`, `q2` or `2` in the path.
fn parse_quarter(raw: &str) -> Result<Quarter, ApiError> {
    raw.parse::<Quarter>().map_err(ApiError::from)
}
