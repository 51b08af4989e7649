use time::{Date, OffsetDateTime};

use super::{
    lifecycle::{NewComment, ReportSubmission},
    models::{
        Comment, PersistedReport, ProjectStatus, Quarter, QuarterlyReport, ReportStatus, UserId,
    },
    schedule::DueDates,
    status::StatusRules,
    MonitoringError,
};

/// Builds one display report per quarter.
///
/// Persisted rows are placed on their quarter; quarters without a row become
/// placeholders. Statuses come from [`StatusRules::resolve`].
pub fn merge_schedule_with_persisted(
    due_dates: &DueDates,
    persisted: &[PersistedReport],
    project_status: ProjectStatus,
    today: Date,
    rules: StatusRules,
) -> [QuarterlyReport; 4] {
    Quarter::ALL.map(|quarter| {
        let status = rules.resolve(quarter, due_dates, persisted, project_status, today);
        let due_date = due_dates[quarter.position()];
        match persisted.iter().find(|r| r.quarter == quarter) {
            Some(row) => QuarterlyReport::from_persisted(row.clone(), due_date, status),
            None => QuarterlyReport::placeholder(quarter, due_date, status),
        }
    })
}

/// The four quarterly reports of a project, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTimeline([QuarterlyReport; 4]);

impl ReportTimeline {
    pub fn merge(
        due_dates: &DueDates,
        persisted: &[PersistedReport],
        project_status: ProjectStatus,
        today: Date,
        rules: StatusRules,
    ) -> Self {
        Self(merge_schedule_with_persisted(
            due_dates,
            persisted,
            project_status,
            today,
            rules,
        ))
    }

    pub fn get(&self, quarter: Quarter) -> &QuarterlyReport {
        &self.0[quarter.position()]
    }

    pub fn get_mut(&mut self, quarter: Quarter) -> &mut QuarterlyReport {
        &mut self.0[quarter.position()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuarterlyReport> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[QuarterlyReport] {
        &self.0
    }

    /// Submits a quarter once its predecessor is Submitted or Verified.
    ///
    /// The next quarter unlocks to Due on success.
    pub fn submit(
        &mut self,
        quarter: Quarter,
        submission: &ReportSubmission,
        now: OffsetDateTime,
    ) -> Result<(), MonitoringError> {
        if let Some(previous) = quarter.previous() {
            if !self.get(previous).status.is_complete() {
                return Err(MonitoringError::PreviousQuarterIncomplete { quarter, previous });
            }
        }

        self.get_mut(quarter).submit(submission, now)?;

        if let Some(next) = Quarter::from_position(quarter.position() + 1) {
            let next = self.get_mut(next);
            if next.status == ReportStatus::Locked {
                next.status = ReportStatus::Due;
            }
        }
        Ok(())
    }

    pub fn verify(&mut self, quarter: Quarter, verifier: &UserId) -> Result<(), MonitoringError> {
        self.get_mut(quarter).verify(verifier)
    }

    pub fn add_comment(
        &mut self,
        quarter: Quarter,
        comment: &NewComment,
        id: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<&Comment, MonitoringError> {
        self.get_mut(quarter).add_comment(comment, id, now)
    }

    /// Re-derives every quarter's status for a new project status.
    ///
    /// Completing a project verifies every filed report and locks the rest.
    /// Any other status restores the statuses recorded for filed reports and
    /// re-classifies the open quarters.
    pub fn apply_project_status(&mut self, status: ProjectStatus, today: Date, rules: StatusRules) {
        let filed: Vec<_> = self
            .0
            .iter()
            .filter_map(|r| r.filed_status.map(|s| (r.quarter, s)))
            .collect();
        for report in self.0.iter_mut() {
            report.status = rules.classify(report.quarter, report.due_date, &filed, status, today);
        }
    }

    /// Progress of the latest filed report, 0 when nothing was filed.
    pub fn latest_progress(&self) -> u8 {
        self.0
            .iter()
            .rev()
            .find(|r| is_filed(r))
            .map(|r| r.progress)
            .unwrap_or(0)
    }

    pub fn filed_count(&self) -> usize {
        self.0.iter().filter(|r| is_filed(r)).count()
    }
}

fn is_filed(report: &QuarterlyReport) -> bool {
    report.filed_status.is_some()
}
