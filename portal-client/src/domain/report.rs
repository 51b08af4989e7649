use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{wire_dates, QuarterKey, ReportRowStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectComment {
    pub id: i64,
    pub comments: String,
    pub users: Option<CommentAuthor>,
    #[serde(default)]
    pub users_id: Option<String>,
}

impl ProjectComment {
    pub fn author_id(&self) -> Option<&str> {
        self.users
            .as_ref()
            .map(|u| u.id.as_str())
            .or(self.users_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExpense {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    /// Column name is misspelled in the backend schema.
    #[serde(rename = "desription", default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire_dates::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A persisted quarterly report with its comments and expenses.
///
/// Rows returned by `POST /project/submit-report` carry no nested lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReport {
    pub id: i64,
    pub funded_project_id: i64,
    pub quarterly_report: QuarterKey,
    pub status: ReportRowStatus,
    #[serde(default)]
    pub progress: Option<i32>,
    pub comment: Option<String>,
    #[serde(default)]
    pub report_file_url: Option<Vec<String>>,
    pub submitted_by_proponent_id: Option<String>,
    #[serde(default, deserialize_with = "wire_dates::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_comments: Vec<ProjectComment>,
    #[serde(default)]
    pub project_expenses: Vec<ProjectExpense>,
}
