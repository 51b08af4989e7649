mod funded_project;
mod payloads;
mod project_detail;
mod project_member;
mod report;
mod status;
pub mod wire_dates;

pub use funded_project::*;
pub use payloads::*;
pub use project_detail::*;
pub use project_member::*;
pub use report::*;
pub use status::*;

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const PROJECT_VIEW: &str = r#"{
        "id": 12,
        "proposal_id": 40,
        "project_lead_id": "9b1c7f0e-lead",
        "status": "on_going",
        "funded_date": "2025-01-10T03:00:00+00:00",
        "created_at": "2025-01-10T03:00:00.512+00:00",
        "proposal": {
            "id": 40,
            "project_title": "Coastal Soil Salinity Mapping",
            "program_title": "Climate Resilient Agriculture",
            "plan_start_date": "2025-01-15",
            "plan_end_date": "2026-01-15",
            "email": null,
            "phone": null,
            "implementation_site": "Iloilo",
            "department": { "id": 1, "name": "College of Agriculture" },
            "sector": null,
            "discipline": null,
            "agency": null,
            "estimated_budget": [
                { "id": 1, "source": "DOST", "ps": 600000, "mooe": 400000.5, "co": null },
                { "id": 2, "source": "LGU", "ps": 0, "mooe": 0, "co": 199999.5 }
            ]
        },
        "project_lead": {
            "id": "9b1c7f0e-lead",
            "first_name": "Maria",
            "last_name": "Santos",
            "email": "maria@example.edu"
        },
        "project_reports": [
            {
                "id": 101,
                "funded_project_id": 12,
                "quarterly_report": "q1_report",
                "status": "verified",
                "progress": 25,
                "comment": null,
                "report_file_url": ["https://files.example.edu/q1.pdf"],
                "submitted_by_proponent_id": "9b1c7f0e-lead",
                "created_at": "2025-04-10T01:00:00+00:00",
                "project_comments": [
                    { "id": 5, "comments": "Receipts attached.", "users": { "id": "9b1c7f0e-lead", "first_name": "Maria", "last_name": "Santos" } }
                ],
                "project_expenses": [
                    { "id": 900, "expenses": 150000, "desription": "Equipment", "created_at": "2025-04-10T01:00:00+00:00" },
                    { "id": 901, "expenses": 20000, "desription": null, "created_at": null }
                ]
            }
        ]
    }"#;

    #[test]
    fn project_view_payload_deserializes() {
        let detail: ProjectDetail = serde_json::from_str(PROJECT_VIEW).expect("deserialize detail");

        assert_eq!(detail.status, FundedProjectStatus::OnGoing);
        assert_eq!(detail.funded_date.unwrap().to_string(), "2025-01-10");
        assert_eq!(detail.total_budget(), Decimal::from(1_200_000));

        let report = &detail.project_reports[0];
        assert_eq!(report.quarterly_report, QuarterKey::Q1);
        assert_eq!(report.status, ReportRowStatus::Verified);
        assert_eq!(report.project_expenses.len(), 2);
        assert_eq!(report.project_expenses[1].description, None);
        assert_eq!(report.project_comments[0].author_id(), Some("9b1c7f0e-lead"));
    }

    #[test]
    fn funded_listing_row_tolerates_missing_relations() {
        let json = r#"{
            "id": 3,
            "proposal_id": 8,
            "project_lead_id": "lead",
            "status": "blocked",
            "funded_date": null,
            "created_at": "2025-02-01T00:00:00+00:00",
            "proposal": null,
            "project_lead": null
        }"#;
        let project: FundedProject = serde_json::from_str(json).expect("deserialize funded row");

        assert_eq!(project.status, FundedProjectStatus::Blocked);
        assert!(project.project_reports.is_empty());
        assert_eq!(project.completion_percentage, None);
    }
}
