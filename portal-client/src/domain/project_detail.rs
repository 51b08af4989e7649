use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{wire_dates, FundedProjectStatus, NamedRef, ProjectLead, ProjectReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub id: i64,
    pub name: String,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub city: Option<String>,
}

/// One row of the proposal's estimated budget, split into personal services,
/// maintenance and other operating expenses, and capital outlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatedBudget {
    pub id: i64,
    pub source: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub ps: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub mooe: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub co: Option<Decimal>,
}

impl EstimatedBudget {
    pub fn total(&self) -> Decimal {
        self.ps.unwrap_or_default() + self.mooe.unwrap_or_default() + self.co.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDetail {
    pub id: i64,
    pub project_title: Option<String>,
    pub program_title: Option<String>,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub plan_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub plan_end_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub implementation_site: Option<String>,
    pub department: Option<NamedRef>,
    pub sector: Option<NamedRef>,
    pub discipline: Option<NamedRef>,
    pub agency: Option<Agency>,
    #[serde(default)]
    pub estimated_budget: Vec<EstimatedBudget>,
}

/// Response of `GET /project/view`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub id: i64,
    pub proposal_id: i64,
    pub project_lead_id: String,
    pub status: FundedProjectStatus,
    #[serde(default, deserialize_with = "wire_dates::date_opt")]
    pub funded_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire_dates::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    pub proposal: Option<ProposalDetail>,
    pub project_lead: Option<ProjectLead>,
    #[serde(default)]
    pub project_reports: Vec<ProjectReport>,
}

impl ProjectDetail {
    /// Grant amount: the sum of every estimated budget row.
    pub fn total_budget(&self) -> Decimal {
        self.proposal
            .as_ref()
            .map(|p| p.estimated_budget.iter().map(EstimatedBudget::total).sum())
            .unwrap_or_default()
    }
}
