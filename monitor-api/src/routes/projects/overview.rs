use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing::instrument;

use crate::{
    adapters::inbound::http::{ProjectDetailResponse, ProjectSummaryResponse},
    app_state::AppState,
    domain::models::{ProjectId, ProjectStatus, UserId},
    routes::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    role: Option<String>,
}

#[instrument(name = "list_projects", skip(app_state))]
pub async fn list_projects(
    State(app_state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<ProjectSummaryResponse>>, ApiError> {
    let projects = app_state
        .monitoring
        .list_projects(query.role.as_deref())
        .await?;

    Ok(Json(
        projects
            .into_iter()
            .map(ProjectSummaryResponse::from)
            .collect(),
    ))
}

#[instrument(name = "list_overdue_projects", skip(app_state))]
pub async fn list_overdue_projects(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProjectSummaryResponse>>, ApiError> {
    let projects = app_state.monitoring.overdue_projects().await?;

    Ok(Json(
        projects
            .into_iter()
            .map(ProjectSummaryResponse::from)
            .collect(),
    ))
}

#[instrument(name = "get_project", skip(app_state))]
pub async fn get_project(
    State(app_state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let snapshot = app_state
        .monitoring
        .project_detail(ProjectId::new(project_id))
        .await?;

    Ok(Json(snapshot.into()))
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    /// Display (`On Hold`) or backend (`on_hold`) form.
    #[serde_as(as = "DisplayFromStr")]
    status: ProjectStatus,
    updated_by: String,
}

#[instrument(name = "update_status", skip(app_state))]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let snapshot = app_state
        .monitoring
        .update_status(
            ProjectId::new(project_id),
            body.status,
            &UserId::new(body.updated_by),
        )
        .await?;

    Ok(Json(snapshot.into()))
}
