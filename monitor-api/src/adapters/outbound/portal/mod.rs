mod conversions;

use async_trait::async_trait;
use portal_client::{
    AddCommentPayload, AddExpensePayload, PortalClient, PortalFetchError,
    SubmitReportPayload, UpdateProjectStatusPayload, VerifyReportPayload,
};

use crate::domain::{
    lifecycle::ReportSubmission,
    models::{
        ExpenseItem, Project, ProjectId, ProjectRecord, ProjectStatus, Quarter, ReportId, UserId,
    },
    ports::outbound::ProjectBackend,
    MonitoringError,
};

use self::conversions::{
    apply_members, to_domain_project, to_domain_record, to_portal_quarter, to_portal_status,
};

/// Adapter that wraps the portal client to implement the ProjectBackend port.
pub struct PortalAdapter {
    client: PortalClient,
}

impl PortalAdapter {
    pub fn new(client: PortalClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectBackend for PortalAdapter {
    async fn list_funded_projects(
        &self,
        role: Option<&str>,
    ) -> Result<Vec<Project>, MonitoringError> {
        let projects = self
            .client
            .fetch_funded_projects(role)
            .await
            .map_err(map_portal_error)?;

        Ok(projects
            .into_iter()
            .filter_map(|item| {
                let id = item.id;
                to_domain_project(item)
                    .map_err(|e| {
                        tracing::warn!("Skipping funded project {} with invalid data: {}", id, e);
                    })
                    .ok()
            })
            .collect())
    }

    async fn get_project(&self, id: ProjectId) -> Result<ProjectRecord, MonitoringError> {
        let detail = self
            .client
            .fetch_project(id.as_i64())
            .await
            .map_err(|e| match e {
                PortalFetchError::NotFound(_) => MonitoringError::ProjectNotFound(id),
                other => map_portal_error(other),
            })?;
        let mut record = to_domain_record(detail)?;

        // Membership is display-only; a failed lookup leaves the co-lead unset.
        match self.client.fetch_project_members(id.as_i64()).await {
            Ok(members) => apply_members(&mut record, &members),
            Err(e) => tracing::warn!("Failed to fetch members of project {}: {}", id, e),
        }
        Ok(record)
    }

    async fn submit_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        submission: &ReportSubmission,
    ) -> Result<ReportId, MonitoringError> {
        let payload = SubmitReportPayload {
            funded_project_id: id.as_i64(),
            quarterly_report: to_portal_quarter(quarter),
            progress: submission.progress,
            comment: submission.note.clone(),
            report_file_url: (!submission.proof_files.is_empty())
                .then(|| submission.proof_files.clone()),
            submitted_by_proponent_id: submission.submitted_by.to_string(),
        };

        let report = self
            .client
            .submit_report(&payload)
            .await
            .map_err(|e| match e {
                PortalFetchError::Conflict(_) => MonitoringError::AlreadySubmitted(quarter),
                other => map_portal_error(other),
            })?;
        Ok(ReportId::new(report.id))
    }

    async fn add_expense(
        &self,
        report_id: ReportId,
        item: &ExpenseItem,
    ) -> Result<i64, MonitoringError> {
        let payload = AddExpensePayload {
            project_reports_id: report_id.as_i64(),
            expenses: item.amount,
            description: item.description.clone(),
        };
        let expense = self
            .client
            .add_expense(&payload)
            .await
            .map_err(map_portal_error)?;
        Ok(expense.id)
    }

    async fn verify_report(
        &self,
        report_id: ReportId,
        verifier: &UserId,
    ) -> Result<(), MonitoringError> {
        let payload = VerifyReportPayload {
            report_id: report_id.as_i64(),
            verified_by_id: verifier.to_string(),
        };
        self.client
            .verify_report(&payload)
            .await
            .map_err(map_portal_error)
    }

    async fn add_comment(
        &self,
        report_id: ReportId,
        author: &UserId,
        text: &str,
    ) -> Result<i64, MonitoringError> {
        let payload = AddCommentPayload {
            project_reports_id: report_id.as_i64(),
            users_id: author.to_string(),
            comments: text.to_string(),
        };
        let comment = self
            .client
            .add_comment(&payload)
            .await
            .map_err(map_portal_error)?;
        Ok(comment.id)
    }

    async fn update_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        updated_by: &UserId,
    ) -> Result<(), MonitoringError> {
        let payload = UpdateProjectStatusPayload {
            project_id: id.as_i64(),
            status: to_portal_status(status),
            updated_by_id: updated_by.to_string(),
        };
        self.client
            .update_project_status(&payload)
            .await
            .map_err(|e| match e {
                PortalFetchError::NotFound(_) => MonitoringError::ProjectNotFound(id),
                other => map_portal_error(other),
            })
    }
}

fn map_portal_error(e: PortalFetchError) -> MonitoringError {
    match e {
        PortalFetchError::Unauthorized => {
            MonitoringError::backend("portal rejected the service credentials")
        }
        PortalFetchError::Rejected(msg) | PortalFetchError::Conflict(msg) => {
            MonitoringError::BackendRejected(msg)
        }
        PortalFetchError::NotFound(msg) => MonitoringError::BackendRejected(msg),
        PortalFetchError::ResponseError(msg) => MonitoringError::backend(msg),
        PortalFetchError::ParsingError(msg) => MonitoringError::backend(msg),
        PortalFetchError::Other(msg) => MonitoringError::backend(msg),
    }
}
