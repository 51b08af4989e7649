use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Date, OffsetDateTime};

use super::{ReportId, UserId};
use crate::domain::MonitoringError;

/// One of the four fixed reporting periods of a funded project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    #[serde(rename = "q1_report")]
    Q1,
    #[serde(rename = "q2_report")]
    Q2,
    #[serde(rename = "q3_report")]
    Q3,
    #[serde(rename = "q4_report")]
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// 1-based quarter index.
    pub fn index(self) -> u8 {
        self.position() as u8 + 1
    }

    /// 0-based position in the timeline.
    pub fn position(self) -> usize {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }

    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).and_then(Self::from_position)
    }

    pub fn key(self) -> &'static str {
        match self {
            Quarter::Q1 => "q1_report",
            Quarter::Q2 => "q2_report",
            Quarter::Q3 => "q3_report",
            Quarter::Q4 => "q4_report",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1 Report",
            Quarter::Q2 => "Q2 Report",
            Quarter::Q3 => "Q3 Report",
            Quarter::Q4 => "Q4 Report",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quarter {
    type Err = MonitoringError;

    /// Accepts `q2_report`, `q2`, `Q2` and `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let short = normalized.strip_suffix("_report").unwrap_or(&normalized);
        let short = short.strip_prefix('q').unwrap_or(short);

        match short {
            "1" => Ok(Quarter::Q1),
            "2" => Ok(Quarter::Q2),
            "3" => Ok(Quarter::Q3),
            "4" => Ok(Quarter::Q4),
            _ => Err(MonitoringError::UnknownQuarter(s.to_string())),
        }
    }
}

/// Display status of a quarterly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ReportStatus {
    Locked,
    Due,
    Submitted,
    Verified,
    Overdue,
}

impl ReportStatus {
    /// Submitted and Verified reports count towards budget utilization and
    /// unlock the following quarter.
    pub fn is_complete(self) -> bool {
        matches!(self, ReportStatus::Submitted | ReportStatus::Verified)
    }
}

/// Who wrote a comment on a report thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum AuthorRole {
    #[serde(rename = "R&D", alias = "rnd")]
    #[strum(to_string = "R&D", serialize = "rnd", ascii_case_insensitive)]
    RnD,
    #[serde(rename = "Proponent", alias = "proponent")]
    #[strum(to_string = "Proponent", ascii_case_insensitive)]
    Proponent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseItem {
    /// Backend row id, absent until persisted.
    pub id: Option<i64>,
    pub description: String,
    pub amount: Decimal,
}

impl ExpenseItem {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: None,
            description: description.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<i64>,
    pub role: AuthorRole,
    pub author_id: Option<UserId>,
    pub text: String,
    /// Backend comment rows carry no timestamp.
    pub timestamp: Option<OffsetDateTime>,
}

/// A report row as persisted by the backend, before it is placed on the
/// quarterly timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReport {
    pub id: ReportId,
    pub quarter: Quarter,
    /// One of Submitted, Verified or Overdue.
    pub status: ReportStatus,
    pub progress: u8,
    pub expenses: Vec<ExpenseItem>,
    pub proofs: Vec<String>,
    pub note: Option<String>,
    pub submitted_by: Option<UserId>,
    pub submitted_at: Option<OffsetDateTime>,
    pub comments: Vec<Comment>,
}

/// A quarter as displayed on the monitoring timeline.
///
/// Quarters without a backend row are placeholders with no `backend_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterlyReport {
    pub quarter: Quarter,
    pub backend_id: Option<ReportId>,
    pub due_date: Date,
    pub status: ReportStatus,
    /// Status last recorded for the filed report, independent of any
    /// project-level override. `None` until the quarter is filed.
    pub filed_status: Option<ReportStatus>,
    pub progress: u8,
    pub expenses: Vec<ExpenseItem>,
    pub proofs: Vec<String>,
    pub note: Option<String>,
    pub submitted_by: Option<UserId>,
    pub submitted_on: Option<Date>,
    pub verified_by: Option<UserId>,
    pub comments: Vec<Comment>,
}

impl QuarterlyReport {
    pub fn placeholder(quarter: Quarter, due_date: Date, status: ReportStatus) -> Self {
        Self {
            quarter,
            backend_id: None,
            due_date,
            status,
            filed_status: None,
            progress: 0,
            expenses: Vec::new(),
            proofs: Vec::new(),
            note: None,
            submitted_by: None,
            submitted_on: None,
            verified_by: None,
            comments: Vec::new(),
        }
    }

    pub fn from_persisted(report: PersistedReport, due_date: Date, status: ReportStatus) -> Self {
        Self {
            quarter: report.quarter,
            backend_id: Some(report.id),
            due_date,
            status,
            filed_status: Some(report.status),
            progress: report.progress,
            expenses: report.expenses,
            proofs: report.proofs,
            note: report.note,
            submitted_by: report.submitted_by,
            submitted_on: report.submitted_at.map(|ts| ts.date()),
            verified_by: None,
            comments: report.comments,
        }
    }
}
