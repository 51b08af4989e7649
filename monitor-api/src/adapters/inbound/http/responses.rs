//! HTTP response types for the monitoring endpoints.
//!
//! These types serialize to the JSON format expected by the review UI.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::domain::{
    budget::BudgetSummary,
    models::{
        AuthorRole, Comment, ExpenseItem, Project, ProjectStatus, ProjectSummary, QuarterlyReport,
        ReportStatus,
    },
    store::ProjectSnapshot,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Row in the funded-projects overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummaryResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub behind_schedule: bool,
}

impl From<ProjectSummary> for ProjectSummaryResponse {
    fn from(summary: ProjectSummary) -> Self {
        Self {
            project: summary.project.into(),
            behind_schedule: summary.behind_schedule,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i64,
    /// Display code, e.g. `PROJ-12`.
    pub code: String,
    pub title: String,
    pub description: String,
    pub lead_id: String,
    pub lead_investigator: String,
    pub co_proponent: Option<String>,
    pub department: String,
    pub research_area: String,
    #[serde(with = "iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub funded_date: Option<Date>,
    pub status: ProjectStatus,
    pub completion_percentage: u8,
    pub reports_count: usize,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.as_i64(),
            code: project.id.code(),
            title: project.title,
            description: project.description,
            lead_id: project.lead_id.to_string(),
            lead_investigator: project.lead_investigator,
            co_proponent: project.co_proponent,
            department: project.department,
            research_area: project.research_area,
            start_date: project.start_date,
            end_date: project.end_date,
            funded_date: project.funded_date,
            status: project.status,
            completion_percentage: project.completion_percentage,
            reports_count: project.reports_count,
        }
    }
}

/// Project with its four quarterly reports and reconciled budget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    pub project: ProjectResponse,
    pub reports: Vec<QuarterlyReportResponse>,
    pub budget: BudgetResponse,
}

impl From<ProjectSnapshot> for ProjectDetailResponse {
    fn from(snapshot: ProjectSnapshot) -> Self {
        Self {
            reports: snapshot
                .timeline
                .iter()
                .cloned()
                .zip(snapshot.expense_totals)
                .map(|(report, total)| QuarterlyReportResponse::new(report, total))
                .collect(),
            budget: snapshot.budget.into(),
            project: snapshot.project.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyReportResponse {
    /// Wire key, e.g. `q1_report`.
    pub quarter: &'static str,
    /// Display label, e.g. `Q1 Report`.
    pub label: &'static str,
    pub report_id: Option<i64>,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub status: ReportStatus,
    pub progress: u8,
    pub expenses: Vec<ExpenseResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    pub proof_files: Vec<String>,
    pub note: Option<String>,
    pub submitted_by: Option<String>,
    #[serde(with = "iso_date::option")]
    pub submitted_on: Option<Date>,
    pub verified_by: Option<String>,
    pub comments: Vec<CommentResponse>,
}

impl QuarterlyReportResponse {
    pub fn new(report: QuarterlyReport, total_expense: Decimal) -> Self {
        Self {
            quarter: report.quarter.key(),
            label: report.quarter.label(),
            report_id: report.backend_id.map(|id| id.as_i64()),
            due_date: report.due_date,
            status: report.status,
            progress: report.progress,
            expenses: report.expenses.into_iter().map(ExpenseResponse::from).collect(),
            total_expense,
            proof_files: report.proofs,
            note: report.note,
            submitted_by: report.submitted_by.map(|id| id.to_string()),
            submitted_on: report.submitted_on,
            verified_by: report.verified_by.map(|id| id.to_string()),
            comments: report.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Option<i64>,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<ExpenseItem> for ExpenseResponse {
    fn from(item: ExpenseItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            amount: item.amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Option<i64>,
    pub role: AuthorRole,
    pub author_id: Option<String>,
    pub text: String,
    /// Absent for comments loaded from the backend.
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            role: comment.role,
            author_id: comment.author_id.map(|id| id.to_string()),
            text: comment.text,
            timestamp: comment.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_used: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub utilization_percent: Option<Decimal>,
    pub over_budget: bool,
}

impl From<BudgetSummary> for BudgetResponse {
    fn from(budget: BudgetSummary) -> Self {
        Self {
            total_budget: budget.total_budget,
            total_used: budget.total_used,
            remaining: budget.remaining,
            utilization_percent: budget.utilization_percent(),
            over_budget: budget.over_budget,
        }
    }
}
