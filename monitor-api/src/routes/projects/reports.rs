use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::parse_quarter;
use crate::{
    adapters::inbound::http::{CommentResponse, ProjectDetailResponse},
    app_state::AppState,
    domain::{
        lifecycle::{NewComment, ReportSubmission},
        models::{AuthorRole, ExpenseItem, ProjectId, UserId},
    },
    routes::ApiError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBody {
    description: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportBody {
    submitted_by: String,
    progress: i32,
    expenses: Vec<ExpenseBody>,
    #[serde(default)]
    proof_files: Vec<String>,
    comment: Option<String>,
}

impl From<SubmitReportBody> for ReportSubmission {
    fn from(body: SubmitReportBody) -> Self {
        Self {
            submitted_by: UserId::new(body.submitted_by),
            progress: body.progress,
            expenses: body
                .expenses
                .into_iter()
                .map(|e| ExpenseItem::new(e.description, e.amount))
                .collect(),
            proof_files: body.proof_files,
            note: body.comment,
        }
    }
}

#[instrument(name = "submit_report", skip(app_state, body))]
pub async fn submit_report(
    State(app_state): State<AppState>,
    Path((project_id, quarter)): Path<(i64, String)>,
    Json(body): Json<SubmitReportBody>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let quarter = parse_quarter(&quarter)?;

    let snapshot = app_state
        .monitoring
        .submit_report(ProjectId::new(project_id), quarter, body.into())
        .await?;

    Ok(Json(snapshot.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReportBody {
    verified_by: String,
}

#[instrument(name = "verify_report", skip(app_state))]
pub async fn verify_report(
    State(app_state): State<AppState>,
    Path((project_id, quarter)): Path<(i64, String)>,
    Json(body): Json<VerifyReportBody>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let quarter = parse_quarter(&quarter)?;

    let snapshot = app_state
        .monitoring
        .verify_report(
            ProjectId::new(project_id),
            quarter,
            &UserId::new(body.verified_by),
        )
        .await?;

    Ok(Json(snapshot.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentBody {
    author_id: String,
    role: AuthorRole,
    text: String,
}

#[instrument(name = "add_comment", skip(app_state, body))]
pub async fn add_comment(
    State(app_state): State<AppState>,
    Path((project_id, quarter)): Path<(i64, String)>,
    Json(body): Json<AddCommentBody>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let quarter = parse_quarter(&quarter)?;
    let comment = NewComment {
        author: UserId::new(body.author_id),
        role: body.role,
        text: body.text,
    };

    let comment = app_state
        .monitoring
        .add_comment(ProjectId::new(project_id), quarter, comment)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}
