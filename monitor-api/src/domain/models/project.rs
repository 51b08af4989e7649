use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::Date;

use super::{PersistedReport, ProjectId, UserId};
use crate::domain::schedule::expected_report_count;

/// Display lifecycle status of a funded project.
///
/// Parsing accepts both the display form and the backend form, so
/// `"On Hold"` and `"on_hold"` resolve to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ProjectStatus {
    #[strum(to_string = "Active", serialize = "on_going")]
    Active,
    #[strum(to_string = "Delayed", serialize = "blocked")]
    Delayed,
    #[strum(to_string = "Completed")]
    Completed,
    #[serde(rename = "On Hold")]
    #[strum(to_string = "On Hold", serialize = "on_hold")]
    OnHold,
}

/// A funded research project under monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    /// Program title of the originating proposal.
    pub description: String,
    pub lead_id: UserId,
    pub lead_investigator: String,
    /// Active co-leads, comma separated. Only loaded with the project detail.
    pub co_proponent: Option<String>,
    pub department: String,
    pub research_area: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub funded_date: Option<Date>,
    pub created_on: Option<Date>,
    pub status: ProjectStatus,
    /// Progress of the most recently created report.
    pub completion_percentage: u8,
    pub reports_count: usize,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            lead_id: UserId::new(""),
            lead_investigator: "Unknown".to_string(),
            co_proponent: None,
            department: "Unassigned".to_string(),
            research_area: String::new(),
            start_date: None,
            end_date: None,
            funded_date: None,
            created_on: None,
            status,
            completion_percentage: 0,
            reports_count: 0,
        }
    }

    pub fn with_lead(mut self, id: impl Into<UserId>, name: impl Into<String>) -> Self {
        self.lead_id = id.into();
        self.lead_investigator = name.into();
        self
    }

    pub fn with_dates(mut self, start: Option<Date>, end: Option<Date>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_funded_date(mut self, funded: Option<Date>) -> Self {
        self.funded_date = funded;
        self
    }

    /// Date the reporting schedule is anchored on.
    ///
    /// Falls back from the planned start to the funding date, then to the
    /// record's creation date.
    pub fn schedule_start(&self) -> Option<Date> {
        self.start_date.or(self.funded_date).or(self.created_on)
    }
}

/// A project as loaded from the backend, with its persisted report rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub project: Project,
    /// Sum of the proposal's estimated budget rows.
    pub total_budget: Decimal,
    pub reports: Vec<PersistedReport>,
}

/// List entry for the project overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: Project,
    pub behind_schedule: bool,
}

impl ProjectSummary {
    pub fn new(project: Project, today: Date) -> Self {
        let behind_schedule = project.is_behind_schedule(today);
        Self {
            project,
            behind_schedule,
        }
    }
}

impl Project {
    /// An Active project that has filed fewer reports than the time since
    /// funding calls for.
    pub fn is_behind_schedule(&self, today: Date) -> bool {
        if self.status != ProjectStatus::Active {
            return false;
        }
        let Some(funded_on) = self.funded_date.or(self.created_on) else {
            return false;
        };
        expected_report_count(funded_on, today) > self.reports_count
    }
}
