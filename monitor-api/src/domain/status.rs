use time::Date;

use super::{
    models::{PersistedReport, ProjectStatus, Quarter, ReportStatus},
    schedule::DueDates,
};

/// Rules for classifying quarters that have no persisted report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusRules {
    /// Mark a missing quarter Overdue instead of Due once its due date has
    /// passed. Off by default, matching the portal's review screens.
    pub flag_overdue_placeholders: bool,
}

impl StatusRules {
    pub fn resolve(
        &self,
        quarter: Quarter,
        due_dates: &DueDates,
        persisted: &[PersistedReport],
        project_status: ProjectStatus,
        today: Date,
    ) -> ReportStatus {
        let filed: Vec<_> = persisted.iter().map(|r| (r.quarter, r.status)).collect();
        self.classify(quarter, due_dates[quarter.position()], &filed, project_status, today)
    }

    /// Classifies a quarter from the statuses recorded for the filed ones.
    pub fn classify(
        &self,
        quarter: Quarter,
        due_date: Date,
        filed: &[(Quarter, ReportStatus)],
        project_status: ProjectStatus,
        today: Date,
    ) -> ReportStatus {
        let completed = project_status == ProjectStatus::Completed;

        if let Some((_, status)) = filed.iter().find(|(q, _)| *q == quarter) {
            return if completed {
                ReportStatus::Verified
            } else {
                *status
            };
        }

        if completed {
            return ReportStatus::Locked;
        }

        if quarter.position() > next_expected_position(filed) {
            ReportStatus::Locked
        } else if self.flag_overdue_placeholders && due_date < today {
            ReportStatus::Overdue
        } else {
            ReportStatus::Due
        }
    }
}

/// Classifies a quarter with the default [`StatusRules`].
pub fn resolve_status(
    quarter: Quarter,
    due_dates: &DueDates,
    persisted: &[PersistedReport],
    project_status: ProjectStatus,
    today: Date,
) -> ReportStatus {
    StatusRules::default().resolve(quarter, due_dates, persisted, project_status, today)
}

/// Position of the quarter right after the highest filed one.
fn next_expected_position(filed: &[(Quarter, ReportStatus)]) -> usize {
    filed
        .iter()
        .map(|(quarter, _)| quarter.position() + 1)
        .max()
        .unwrap_or(0)
}
