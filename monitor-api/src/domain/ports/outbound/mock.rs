//! In-memory backend for service and router tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::ProjectBackend;
use crate::domain::{
    lifecycle::ReportSubmission,
    models::{
        AuthorRole, Comment, ExpenseItem, PersistedReport, Project, ProjectId, ProjectRecord,
        ProjectStatus, Quarter, ReportId, ReportStatus, UserId,
    },
    MonitoringError,
};

/// Mock backend holding project records in a HashMap.
///
/// Mutations behave like the portal: submitting a quarter twice conflicts,
/// and rows get sequential ids.
#[derive(Clone, Default)]
pub struct MockProjectBackend {
    records: Arc<RwLock<HashMap<ProjectId, ProjectRecord>>>,
    next_id: Arc<RwLock<i64>>,
    /// Error returned by every call while set.
    failure: Arc<RwLock<Option<MonitoringError>>>,
    /// Error returned by calls with the given name while set.
    call_failure: Arc<RwLock<Option<(String, MonitoringError)>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProjectBackend {
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(RwLock::new(1000)),
            ..Self::default()
        }
    }

    pub fn with_record(self, record: ProjectRecord) -> Self {
        self.records
            .write()
            .unwrap()
            .insert(record.project.id, record);
        self
    }

    pub fn fail_with(&self, error: Option<MonitoringError>) {
        *self.failure.write().unwrap() = error;
    }

    pub fn fail_call(&self, call: &str, error: MonitoringError) {
        *self.call_failure.write().unwrap() = Some((call.to_string(), error));
    }

    /// Names of the backend calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn record(&self, id: ProjectId) -> Option<ProjectRecord> {
        self.records.read().unwrap().get(&id).cloned()
    }

    fn enter(&self, call: &str) -> Result<(), MonitoringError> {
        self.calls.write().unwrap().push(call.to_string());
        if let Some(error) = self.failure.read().unwrap().clone() {
            return Err(error);
        }
        match self.call_failure.read().unwrap().clone() {
            Some((name, error)) if name == call => Err(error),
            _ => Ok(()),
        }
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.write().unwrap();
        *next += 1;
        *next
    }

    fn with_report<T>(
        &self,
        report_id: ReportId,
        f: impl FnOnce(&mut PersistedReport) -> T,
    ) -> Result<T, MonitoringError> {
        let mut records = self.records.write().unwrap();
        records
            .values_mut()
            .flat_map(|record| record.reports.iter_mut())
            .find(|report| report.id == report_id)
            .map(f)
            .ok_or_else(|| MonitoringError::BackendRejected(format!("report {report_id} not found")))
    }
}

#[async_trait]
impl ProjectBackend for MockProjectBackend {
    async fn list_funded_projects(
        &self,
        _role: Option<&str>,
    ) -> Result<Vec<Project>, MonitoringError> {
        self.enter("list_funded_projects")?;
        let mut projects: Vec<Project> = self
            .records
            .read()
            .unwrap()
            .values()
            .map(|record| {
                let mut project = record.project.clone();
                project.reports_count = record.reports.len();
                project
            })
            .collect();
        projects.sort_by_key(|p| p.id.as_i64());
        Ok(projects)
    }

    async fn get_project(&self, id: ProjectId) -> Result<ProjectRecord, MonitoringError> {
        self.enter("get_project")?;
        self.record(id).ok_or(MonitoringError::ProjectNotFound(id))
    }

    async fn submit_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        submission: &ReportSubmission,
    ) -> Result<ReportId, MonitoringError> {
        self.enter("submit_report")?;
        let report_id = ReportId::new(self.allocate_id());
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or(MonitoringError::ProjectNotFound(id))?;
        if record.reports.iter().any(|r| r.quarter == quarter) {
            return Err(MonitoringError::AlreadySubmitted(quarter));
        }
        record.reports.push(PersistedReport {
            id: report_id,
            quarter,
            status: ReportStatus::Submitted,
            progress: submission.progress as u8,
            expenses: Vec::new(),
            proofs: submission.proof_files.clone(),
            note: submission.note.clone(),
            submitted_by: Some(submission.submitted_by.clone()),
            submitted_at: Some(OffsetDateTime::now_utc()),
            comments: Vec::new(),
        });
        Ok(report_id)
    }

    async fn add_expense(
        &self,
        report_id: ReportId,
        item: &ExpenseItem,
    ) -> Result<i64, MonitoringError> {
        self.enter("add_expense")?;
        let expense_id = self.allocate_id();
        self.with_report(report_id, |report| {
            report.expenses.push(ExpenseItem {
                id: Some(expense_id),
                ..item.clone()
            });
        })?;
        Ok(expense_id)
    }

    async fn verify_report(
        &self,
        report_id: ReportId,
        _verifier: &UserId,
    ) -> Result<(), MonitoringError> {
        self.enter("verify_report")?;
        self.with_report(report_id, |report| report.status = ReportStatus::Verified)
    }

    async fn add_comment(
        &self,
        report_id: ReportId,
        author: &UserId,
        text: &str,
    ) -> Result<i64, MonitoringError> {
        self.enter("add_comment")?;
        let comment_id = self.allocate_id();
        self.with_report(report_id, |report| {
            report.comments.push(Comment {
                id: Some(comment_id),
                role: AuthorRole::RnD,
                author_id: Some(author.clone()),
                text: text.to_string(),
                timestamp: None,
            });
        })?;
        Ok(comment_id)
    }

    async fn update_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        _updated_by: &UserId,
    ) -> Result<(), MonitoringError> {
        self.enter("update_project_status")?;
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or(MonitoringError::ProjectNotFound(id))?;
        record.project.status = status;
        Ok(())
    }
}
