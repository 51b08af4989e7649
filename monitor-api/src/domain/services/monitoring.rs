use std::sync::Arc;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;

use crate::domain::{
    lifecycle::{NewComment, ReportSubmission},
    models::{Comment, ProjectId, ProjectStatus, ProjectSummary, Quarter, ReportId, UserId},
    ports::{inbound::MonitoringService, outbound::ProjectBackend},
    status::StatusRules,
    store::{ProjectSnapshot, ProjectStore},
    MonitoringError,
};

/// Implementation of the MonitoringService inbound port.
///
/// Every mutation is checked against a copy of the cached snapshot before the
/// backend is called, and committed to the store only after the backend
/// accepted it.
pub struct MonitoringServiceImpl<B> {
    backend: Arc<B>,
    store: Arc<RwLock<ProjectStore>>,
    now: fn() -> OffsetDateTime,
}

impl<B> MonitoringServiceImpl<B> {
    pub fn new(backend: Arc<B>, rules: StatusRules) -> Self {
        Self::with_store(backend, Arc::new(RwLock::new(ProjectStore::new(rules))))
    }

    pub fn with_store(backend: Arc<B>, store: Arc<RwLock<ProjectStore>>) -> Self {
        Self {
            backend,
            store,
            now: OffsetDateTime::now_utc,
        }
    }

    /// Replaces the clock used for due-date evaluation and timestamps.
    pub fn with_clock(mut self, now: fn() -> OffsetDateTime) -> Self {
        self.now = now;
        self
    }

    fn today(&self) -> Date {
        (self.now)().date()
    }
}

impl<B: ProjectBackend> MonitoringServiceImpl<B> {
    async fn fetch_and_load(&self, id: ProjectId) -> Result<ProjectSnapshot, MonitoringError> {
        let record = self.backend.get_project(id).await?;
        let today = self.today();
        let mut store = self.store.write().await;
        Ok(store.load(record, today)?.clone())
    }

    /// Makes sure the project is cached before a mutation is previewed.
    async fn ensure_loaded(&self, id: ProjectId) -> Result<(), MonitoringError> {
        if self.store.read().await.get(id).is_some() {
            return Ok(());
        }
        self.fetch_and_load(id).await.map(|_| ())
    }

    fn persisted_id(
        snapshot: &ProjectSnapshot,
        quarter: Quarter,
    ) -> Result<ReportId, MonitoringError> {
        snapshot
            .timeline
            .get(quarter)
            .backend_id
            .ok_or(MonitoringError::ReportNotPersisted(quarter))
    }
}

#[async_trait]
impl<B: ProjectBackend> MonitoringService for MonitoringServiceImpl<B> {
    async fn list_projects(
        &self,
        role: Option<&str>,
    ) -> Result<Vec<ProjectSummary>, MonitoringError> {
        let today = self.today();
        let projects = self.backend.list_funded_projects(role).await?;
        Ok(projects
            .into_iter()
            .map(|project| ProjectSummary::new(project, today))
            .collect())
    }

    async fn overdue_projects(&self) -> Result<Vec<ProjectSummary>, MonitoringError> {
        let summaries = self.list_projects(None).await?;
        Ok(summaries.into_iter().filter(|s| s.behind_schedule).collect())
    }

    async fn project_detail(&self, id: ProjectId) -> Result<ProjectSnapshot, MonitoringError> {
        self.fetch_and_load(id).await
    }

    async fn submit_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        submission: ReportSubmission,
    ) -> Result<ProjectSnapshot, MonitoringError> {
        self.ensure_loaded(id).await?;
        let now = (self.now)();

        self.store
            .read()
            .await
            .preview(id, |s| s.timeline.submit(quarter, &submission, now))?;

        let report_id = self.backend.submit_report(id, quarter, &submission).await?;

        let mut committed = submission.clone();
        for item in committed.expenses.iter_mut() {
            match self.backend.add_expense(report_id, item).await {
                Ok(expense_id) => item.id = Some(expense_id),
                Err(e) => {
                    tracing::error!(
                        "Failed to attach expense to report {} of project {}: {:?}",
                        report_id,
                        id,
                        e
                    );
                    return Err(e);
                }
            }
        }

        let mut store = self.store.write().await;
        let snapshot = store.apply_submission(id, quarter, &committed, Some(report_id), now)?;
        Ok(snapshot.clone())
    }

    async fn verify_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        verifier: &UserId,
    ) -> Result<ProjectSnapshot, MonitoringError> {
        self.ensure_loaded(id).await?;

        let report_id = {
            let store = self.store.read().await;
            let draft = store.preview(id, |s| s.timeline.verify(quarter, verifier))?;
            Self::persisted_id(&draft, quarter)?
        };

        self.backend.verify_report(report_id, verifier).await?;

        let mut store = self.store.write().await;
        let snapshot = store.apply_verification(id, quarter, verifier)?;
        Ok(snapshot.clone())
    }

    async fn add_comment(
        &self,
        id: ProjectId,
        quarter: Quarter,
        comment: NewComment,
    ) -> Result<Comment, MonitoringError> {
        self.ensure_loaded(id).await?;
        let now = (self.now)();

        let report_id = {
            let store = self.store.read().await;
            let draft = store.preview(id, |s| {
                s.timeline
                    .add_comment(quarter, &comment, None, now)
                    .map(|_| ())
            })?;
            Self::persisted_id(&draft, quarter)?
        };

        let text = comment.validated_text()?.to_string();
        let comment_id = self
            .backend
            .add_comment(report_id, &comment.author, &text)
            .await?;

        let mut store = self.store.write().await;
        store.apply_comment(id, quarter, &comment, Some(comment_id), now)
    }

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        updated_by: &UserId,
    ) -> Result<ProjectSnapshot, MonitoringError> {
        self.ensure_loaded(id).await?;

        self.backend
            .update_project_status(id, status, updated_by)
            .await?;

        let local = {
            let mut store = self.store.write().await;
            store.apply_status_change(id, status, self.today())?.clone()
        };

        match self.fetch_and_load(id).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::warn!(
                    "Status of project {} updated but refresh failed, keeping local state: {:?}",
                    id,
                    e
                );
                Ok(local)
            }
        }
    }
}
