use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{wire_dates, FundedProjectStatus, QuarterKey, ReportRowStatus};

/// `{ id, name }` lookup rows (department, sector, discipline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProjectLead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Proposal fields included in the funded-project listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub id: i64,
    pub project_title: Option<String>,
    pub program_title: Option<String>,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub plan_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub plan_end_date: Option<NaiveDate>,
    pub department: Option<NamedRef>,
    pub sector: Option<NamedRef>,
}

/// Minimal report row nested in the funded-project listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportHeader {
    pub id: i64,
    pub quarterly_report: QuarterKey,
    pub status: ReportRowStatus,
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default, deserialize_with = "wire_dates::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A row of `GET /project/funded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundedProject {
    pub id: i64,
    pub proposal_id: i64,
    pub project_lead_id: String,
    pub status: FundedProjectStatus,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub funded_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire_dates::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_percentage: Option<i32>,
    #[serde(default)]
    pub reports_count: Option<usize>,
    pub proposal: Option<ProposalSummary>,
    pub project_lead: Option<ProjectLead>,
    #[serde(default)]
    pub project_reports: Vec<ReportHeader>,
}
