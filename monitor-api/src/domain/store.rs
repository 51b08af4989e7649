use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use super::{
    budget::{expense_total, reconcile, BudgetSummary},
    lifecycle::{NewComment, ReportSubmission},
    models::{Comment, Project, ProjectId, ProjectRecord, ProjectStatus, Quarter, ReportId, UserId},
    schedule::derive_due_dates,
    status::StatusRules,
    timeline::ReportTimeline,
    MonitoringError,
};

/// Monitoring view of one project: its timeline and reconciled budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub total_budget: Decimal,
    pub timeline: ReportTimeline,
    pub budget: BudgetSummary,
    /// Expense sum of each quarter, in timeline order.
    pub expense_totals: [Decimal; 4],
}

impl ProjectSnapshot {
    pub fn from_record(
        record: ProjectRecord,
        today: Date,
        rules: StatusRules,
    ) -> Result<Self, MonitoringError> {
        let ProjectRecord {
            project,
            total_budget,
            reports,
        } = record;

        // Projects without any schedule date are anchored on the day they
        // are first viewed.
        let due_dates = derive_due_dates(project.schedule_start().unwrap_or(today));
        let timeline = ReportTimeline::merge(&due_dates, &reports, project.status, today, rules);
        let expense_totals = expense_totals(&timeline)?;
        let budget = reconcile(timeline.as_slice(), total_budget, project.status)?;

        Ok(Self {
            project,
            total_budget,
            timeline,
            budget,
            expense_totals,
        })
    }

    /// Recomputes the derived parts after a timeline change.
    fn refresh(&mut self) -> Result<(), MonitoringError> {
        self.expense_totals = expense_totals(&self.timeline)?;
        self.budget = reconcile(self.timeline.as_slice(), self.total_budget, self.project.status)?;
        self.project.completion_percentage = self.timeline.latest_progress();
        self.project.reports_count = self.timeline.filed_count();
        Ok(())
    }
}

fn expense_totals(timeline: &ReportTimeline) -> Result<[Decimal; 4], MonitoringError> {
    let mut totals = [Decimal::ZERO; 4];
    for (total, report) in totals.iter_mut().zip(timeline.iter()) {
        *total = expense_total(report)?;
    }
    Ok(totals)
}

/// In-memory state of every project viewed through the service.
///
/// Every mutation runs on a copy of the snapshot and is committed only when
/// it succeeds.
#[derive(Debug, Default)]
pub struct ProjectStore {
    snapshots: HashMap<ProjectId, ProjectSnapshot>,
    rules: StatusRules,
}

impl ProjectStore {
    pub fn new(rules: StatusRules) -> Self {
        Self {
            snapshots: HashMap::new(),
            rules,
        }
    }

    /// Replaces the project's snapshot with one built from a fresh record.
    ///
    /// A record whose amounts cannot be reconciled is reported as a backend
    /// fault and leaves any cached snapshot in place.
    pub fn load(
        &mut self,
        record: ProjectRecord,
        today: Date,
    ) -> Result<&ProjectSnapshot, MonitoringError> {
        let id = record.project.id;
        let snapshot = ProjectSnapshot::from_record(record, today, self.rules)
            .map_err(|e| MonitoringError::backend(format!("project {id}: {e}")))?;
        self.snapshots.insert(id, snapshot);
        Ok(&self.snapshots[&id])
    }

    pub fn get(&self, id: ProjectId) -> Option<&ProjectSnapshot> {
        self.snapshots.get(&id)
    }

    pub fn snapshot(&self, id: ProjectId) -> Result<&ProjectSnapshot, MonitoringError> {
        self.get(id).ok_or(MonitoringError::ProjectNotFound(id))
    }

    /// Runs `change` on a copy of the snapshot without committing it.
    pub fn preview<F>(&self, id: ProjectId, change: F) -> Result<ProjectSnapshot, MonitoringError>
    where
        F: FnOnce(&mut ProjectSnapshot) -> Result<(), MonitoringError>,
    {
        let mut draft = self.snapshot(id)?.clone();
        change(&mut draft)?;
        draft.refresh()?;
        Ok(draft)
    }

    fn commit<F>(&mut self, id: ProjectId, change: F) -> Result<&ProjectSnapshot, MonitoringError>
    where
        F: FnOnce(&mut ProjectSnapshot) -> Result<(), MonitoringError>,
    {
        let draft = self.preview(id, change)?;
        self.snapshots.insert(id, draft);
        Ok(&self.snapshots[&id])
    }

    pub fn apply_submission(
        &mut self,
        id: ProjectId,
        quarter: Quarter,
        submission: &ReportSubmission,
        backend_id: Option<ReportId>,
        now: OffsetDateTime,
    ) -> Result<&ProjectSnapshot, MonitoringError> {
        self.commit(id, |snapshot| {
            snapshot.timeline.submit(quarter, submission, now)?;
            let report = snapshot.timeline.get_mut(quarter);
            if backend_id.is_some() {
                report.backend_id = backend_id;
            }
            Ok(())
        })
    }

    pub fn apply_verification(
        &mut self,
        id: ProjectId,
        quarter: Quarter,
        verifier: &UserId,
    ) -> Result<&ProjectSnapshot, MonitoringError> {
        self.commit(id, |snapshot| snapshot.timeline.verify(quarter, verifier))
    }

    /// Appends a comment and returns it as stored.
    pub fn apply_comment(
        &mut self,
        id: ProjectId,
        quarter: Quarter,
        comment: &NewComment,
        comment_id: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<Comment, MonitoringError> {
        let snapshot = self.commit(id, |snapshot| {
            snapshot
                .timeline
                .add_comment(quarter, comment, comment_id, now)
                .map(|_| ())
        })?;
        snapshot
            .timeline
            .get(quarter)
            .comments
            .last()
            .cloned()
            .ok_or(MonitoringError::ReportNotPersisted(quarter))
    }

    pub fn apply_status_change(
        &mut self,
        id: ProjectId,
        status: ProjectStatus,
        today: Date,
    ) -> Result<&ProjectSnapshot, MonitoringError> {
        let rules = self.rules;
        self.commit(id, |snapshot| {
            snapshot.project.status = status;
            snapshot.timeline.apply_project_status(status, today, rules);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;
    use crate::domain::models::{
        AuthorRole, ExpenseItem, PersistedReport, QuarterlyReport, ReportStatus,
    };

    const TODAY: Date = date!(2025 - 05 - 01);
    const NOW: OffsetDateTime = datetime!(2025-05-01 10:00 UTC);

    fn record() -> ProjectRecord {
        let project = Project::new(7, "Coastal erosion monitoring", ProjectStatus::Active)
            .with_lead("lead-1", "Dr. Reyes")
            .with_dates(Some(date!(2025 - 01 - 15)), Some(date!(2026 - 01 - 15)));
        ProjectRecord {
            project,
            total_budget: Decimal::from(1_200_000),
            reports: vec![PersistedReport {
                id: ReportId::new(41),
                quarter: Quarter::Q1,
                status: ReportStatus::Verified,
                progress: 30,
                expenses: vec![
                    ExpenseItem::new("Drone rental", Decimal::from(120_000)),
                    ExpenseItem::new("Field staff", Decimal::from(50_000)),
                ],
                proofs: Vec::new(),
                note: None,
                submitted_by: Some(UserId::new("lead-1")),
                submitted_at: Some(datetime!(2025-04-10 09:00 UTC)),
                comments: Vec::new(),
            }],
        }
    }

    fn submission(amount: i64) -> ReportSubmission {
        ReportSubmission {
            submitted_by: UserId::new("lead-1"),
            progress: 55,
            expenses: vec![ExpenseItem::new("Sensors", Decimal::from(amount))],
            proof_files: vec!["https://files.example.org/q2.pdf".to_string()],
            note: None,
        }
    }

    fn loaded_store() -> (ProjectStore, ProjectId) {
        let mut store = ProjectStore::default();
        let id = store.load(record(), TODAY).expect("load").project.id;
        (store, id)
    }

    #[test]
    fn load_builds_timeline_and_budget() {
        let (store, id) = loaded_store();
        let snapshot = store.snapshot(id).expect("snapshot");

        let statuses: Vec<_> = snapshot.timeline.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                ReportStatus::Verified,
                ReportStatus::Due,
                ReportStatus::Locked,
                ReportStatus::Locked
            ]
        );
        assert_eq!(snapshot.budget.total_used, Decimal::from(170_000));
        assert_eq!(snapshot.budget.remaining, Decimal::from(1_030_000));
    }

    #[test]
    fn submission_commits_and_reconciles() {
        let (mut store, id) = loaded_store();

        let snapshot = store
            .apply_submission(id, Quarter::Q2, &submission(80_000), Some(ReportId::new(42)), NOW)
            .expect("submit Q2");

        let q2: &QuarterlyReport = snapshot.timeline.get(Quarter::Q2);
        assert_eq!(q2.status, ReportStatus::Submitted);
        assert_eq!(q2.backend_id, Some(ReportId::new(42)));
        assert_eq!(snapshot.timeline.get(Quarter::Q3).status, ReportStatus::Due);
        assert_eq!(snapshot.budget.total_used, Decimal::from(250_000));
        assert_eq!(snapshot.budget.remaining, Decimal::from(950_000));
        assert_eq!(snapshot.project.completion_percentage, 55);
        assert_eq!(snapshot.project.reports_count, 2);
    }

    #[test]
    fn failed_mutation_leaves_store_untouched() {
        let (mut store, id) = loaded_store();
        let before = store.snapshot(id).expect("snapshot").clone();

        let mut empty = submission(0);
        empty.expenses.clear();
        assert_eq!(
            store
                .apply_submission(id, Quarter::Q2, &empty, None, NOW)
                .unwrap_err(),
            MonitoringError::EmptyExpenses
        );
        assert!(store
            .apply_verification(id, Quarter::Q2, &UserId::new("officer"))
            .is_err());

        assert_eq!(store.snapshot(id).expect("snapshot"), &before);
    }

    #[test]
    fn preview_does_not_commit() {
        let (store, id) = loaded_store();

        let draft = store
            .preview(id, |s| s.timeline.submit(Quarter::Q2, &submission(10), NOW))
            .expect("preview");

        assert_eq!(draft.timeline.get(Quarter::Q2).status, ReportStatus::Submitted);
        assert_eq!(
            store.snapshot(id).expect("snapshot").timeline.get(Quarter::Q2).status,
            ReportStatus::Due
        );
    }

    #[test]
    fn verification_and_comments() {
        let (mut store, id) = loaded_store();
        store
            .apply_submission(id, Quarter::Q2, &submission(80_000), Some(ReportId::new(42)), NOW)
            .expect("submit");

        let comment = store
            .apply_comment(
                id,
                Quarter::Q2,
                &NewComment {
                    author: UserId::new("officer-2"),
                    role: AuthorRole::RnD,
                    text: "Receipts look complete".to_string(),
                },
                Some(5),
                NOW,
            )
            .expect("comment");
        assert_eq!(comment.id, Some(5));
        assert_eq!(comment.timestamp, Some(NOW));

        let snapshot = store
            .apply_verification(id, Quarter::Q2, &UserId::new("officer-2"))
            .expect("verify");
        let q2 = snapshot.timeline.get(Quarter::Q2);
        assert_eq!(q2.status, ReportStatus::Verified);
        assert_eq!(q2.comments.len(), 1);
    }

    #[test]
    fn completing_the_project_closes_the_budget() {
        let (mut store, id) = loaded_store();

        let snapshot = store
            .apply_status_change(id, ProjectStatus::Completed, TODAY)
            .expect("complete");

        assert_eq!(snapshot.project.status, ProjectStatus::Completed);
        assert_eq!(snapshot.budget.total_used, Decimal::from(1_200_000));
        assert_eq!(snapshot.budget.remaining, Decimal::ZERO);
        assert_eq!(snapshot.timeline.get(Quarter::Q2).status, ReportStatus::Locked);
    }

    #[test]
    fn unknown_project_is_not_found() {
        let mut store = ProjectStore::new(StatusRules::default());
        let id = ProjectId::new(99);
        assert_eq!(
            store
                .apply_status_change(id, ProjectStatus::OnHold, TODAY)
                .unwrap_err(),
            MonitoringError::ProjectNotFound(id)
        );
    }

    #[test]
    fn reopening_after_completion_restores_the_timeline() {
        let (mut store, id) = loaded_store();
        store
            .apply_submission(id, Quarter::Q2, &submission(80_000), Some(ReportId::new(42)), NOW)
            .expect("submit Q2");
        store
            .apply_status_change(id, ProjectStatus::Completed, TODAY)
            .expect("complete");

        let snapshot = store
            .apply_status_change(id, ProjectStatus::Active, TODAY)
            .expect("reopen");

        let statuses: Vec<_> = snapshot.timeline.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                ReportStatus::Verified,
                ReportStatus::Submitted,
                ReportStatus::Due,
                ReportStatus::Locked
            ]
        );
        assert_eq!(snapshot.budget.total_used, Decimal::from(250_000));
        assert_eq!(snapshot.budget.remaining, Decimal::from(950_000));
    }

    #[test]
    fn overflowing_submission_is_rejected_without_panicking() {
        let (mut store, id) = loaded_store();
        let before = store.snapshot(id).expect("snapshot").clone();

        let mut huge = submission(0);
        huge.expenses = vec![
            ExpenseItem::new("Sensors", Decimal::MAX),
            ExpenseItem::new("Sensors", Decimal::MAX),
        ];
        assert!(matches!(
            store.apply_submission(id, Quarter::Q2, &huge, None, NOW),
            Err(MonitoringError::InvalidExpense { .. })
        ));

        // Passes validation on its own but overflows against the Q1 spend.
        let mut q1_heavy = record();
        q1_heavy.reports[0].expenses = vec![ExpenseItem::new("Drone rental", Decimal::MAX)];
        store.load(q1_heavy, TODAY).expect("load");
        assert_eq!(
            store
                .apply_submission(id, Quarter::Q2, &submission(80_000), None, NOW)
                .unwrap_err(),
            MonitoringError::AmountOverflow
        );
        assert_eq!(
            store.snapshot(id).expect("snapshot").timeline.get(Quarter::Q2).status,
            before.timeline.get(Quarter::Q2).status
        );
    }

    #[test]
    fn unreconcilable_record_is_a_backend_error() {
        let (mut store, id) = loaded_store();
        let before = store.snapshot(id).expect("snapshot").clone();

        let mut broken = record();
        broken.reports[0].expenses = vec![
            ExpenseItem::new("Drone rental", Decimal::MAX),
            ExpenseItem::new("Field staff", Decimal::MAX),
        ];

        assert!(matches!(
            store.load(broken, TODAY),
            Err(MonitoringError::Backend(_))
        ));
        assert_eq!(store.snapshot(id).expect("snapshot"), &before);
    }
}
