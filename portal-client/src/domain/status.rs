use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a funded project as stored by the portal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FundedProjectStatus {
    OnGoing,
    Completed,
    OnHold,
    Blocked,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Status of a persisted quarterly report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportRowStatus {
    Submitted,
    Verified,
    Overdue,
}

/// Quarter key as used on the wire (`q1_report` .. `q4_report`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum QuarterKey {
    #[serde(rename = "q1_report")]
    #[strum(serialize = "q1_report")]
    Q1,
    #[serde(rename = "q2_report")]
    #[strum(serialize = "q2_report")]
    Q2,
    #[serde(rename = "q3_report")]
    #[strum(serialize = "q3_report")]
    Q3,
    #[serde(rename = "q4_report")]
    #[strum(serialize = "q4_report")]
    Q4,
}

impl QuarterKey {
    pub const ALL: [QuarterKey; 4] = [QuarterKey::Q1, QuarterKey::Q2, QuarterKey::Q3, QuarterKey::Q4];
}
