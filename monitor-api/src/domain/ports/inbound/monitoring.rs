use async_trait::async_trait;

use crate::domain::{
    lifecycle::{NewComment, ReportSubmission},
    models::{Comment, ProjectId, ProjectStatus, ProjectSummary, Quarter, UserId},
    store::ProjectSnapshot,
    MonitoringError,
};

/// Inbound port for project monitoring.
///
/// HTTP handlers call these use cases; the implementation coordinates the
/// backend port with the in-memory project store.
#[async_trait]
pub trait MonitoringService: Send + Sync + 'static {
    /// Funded projects visible to `role`, with a behind-schedule flag.
    async fn list_projects(&self, role: Option<&str>)
        -> Result<Vec<ProjectSummary>, MonitoringError>;

    /// Active projects that have filed fewer reports than expected.
    async fn overdue_projects(&self) -> Result<Vec<ProjectSummary>, MonitoringError>;

    /// Fetches the project from the backend and rebuilds its snapshot.
    async fn project_detail(&self, id: ProjectId) -> Result<ProjectSnapshot, MonitoringError>;

    /// Orchestrates: validate → create report → attach expenses → commit.
    async fn submit_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        submission: ReportSubmission,
    ) -> Result<ProjectSnapshot, MonitoringError>;

    async fn verify_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        verifier: &UserId,
    ) -> Result<ProjectSnapshot, MonitoringError>;

    /// Returns the comment as appended to the thread.
    async fn add_comment(
        &self,
        id: ProjectId,
        quarter: Quarter,
        comment: NewComment,
    ) -> Result<Comment, MonitoringError>;

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        updated_by: &UserId,
    ) -> Result<ProjectSnapshot, MonitoringError>;
}
