use rust_decimal::Decimal;
use serde::Serialize;

use super::{FundedProjectStatus, QuarterKey};

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReportPayload {
    pub funded_project_id: i64,
    pub quarterly_report: QuarterKey,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file_url: Option<Vec<String>>,
    pub submitted_by_proponent_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddExpensePayload {
    pub project_reports_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    #[serde(rename = "desription")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReportPayload {
    pub report_id: i64,
    pub verified_by_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCommentPayload {
    pub project_reports_id: i64,
    pub users_id: String,
    pub comments: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectStatusPayload {
    pub project_id: i64,
    pub status: FundedProjectStatus,
    pub updated_by_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_payload_keeps_backend_column_names() {
        let payload = AddExpensePayload {
            project_reports_id: 7,
            expenses: Decimal::new(1500050, 2),
            description: "Lab testing fees".to_string(),
        };
        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["desription"], "Lab testing fees");
        assert_eq!(json["expenses"], 15000.5);
    }

    #[test]
    fn submit_payload_omits_empty_optionals() {
        let payload = SubmitReportPayload {
            funded_project_id: 3,
            quarterly_report: QuarterKey::Q2,
            progress: 50,
            comment: None,
            report_file_url: None,
            submitted_by_proponent_id: "user-1".to_string(),
        };
        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["quarterly_report"], "q2_report");
        assert!(json.get("comment").is_none());
        assert!(json.get("report_file_url").is_none());
    }
}
