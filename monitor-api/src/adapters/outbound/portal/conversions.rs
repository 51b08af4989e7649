use chrono::{DateTime, Datelike, NaiveDate, Utc};
use time::{Date, OffsetDateTime};

use crate::domain::{
    models::{
        AuthorRole, Comment, ExpenseItem, PersistedReport, Project, ProjectRecord, ProjectStatus,
        Quarter, ReportId, ReportStatus, UserId,
    },
    MonitoringError,
};

const UNTITLED: &str = "Untitled Project";

/// Backend project status to display status. Unknown values read as Active.
pub fn to_domain_status(status: portal_client::FundedProjectStatus) -> ProjectStatus {
    match status {
        portal_client::FundedProjectStatus::OnGoing => ProjectStatus::Active,
        portal_client::FundedProjectStatus::Completed => ProjectStatus::Completed,
        portal_client::FundedProjectStatus::OnHold => ProjectStatus::OnHold,
        portal_client::FundedProjectStatus::Blocked => ProjectStatus::Delayed,
        portal_client::FundedProjectStatus::Unknown => ProjectStatus::Active,
    }
}

pub fn to_portal_status(status: ProjectStatus) -> portal_client::FundedProjectStatus {
    match status {
        ProjectStatus::Active => portal_client::FundedProjectStatus::OnGoing,
        ProjectStatus::Completed => portal_client::FundedProjectStatus::Completed,
        ProjectStatus::OnHold => portal_client::FundedProjectStatus::OnHold,
        ProjectStatus::Delayed => portal_client::FundedProjectStatus::Blocked,
    }
}

pub fn to_domain_quarter(key: portal_client::QuarterKey) -> Quarter {
    match key {
        portal_client::QuarterKey::Q1 => Quarter::Q1,
        portal_client::QuarterKey::Q2 => Quarter::Q2,
        portal_client::QuarterKey::Q3 => Quarter::Q3,
        portal_client::QuarterKey::Q4 => Quarter::Q4,
    }
}

pub fn to_portal_quarter(quarter: Quarter) -> portal_client::QuarterKey {
    match quarter {
        Quarter::Q1 => portal_client::QuarterKey::Q1,
        Quarter::Q2 => portal_client::QuarterKey::Q2,
        Quarter::Q3 => portal_client::QuarterKey::Q3,
        Quarter::Q4 => portal_client::QuarterKey::Q4,
    }
}

pub fn to_domain_report_status(status: portal_client::ReportRowStatus) -> ReportStatus {
    match status {
        portal_client::ReportRowStatus::Submitted => ReportStatus::Submitted,
        portal_client::ReportRowStatus::Verified => ReportStatus::Verified,
        portal_client::ReportRowStatus::Overdue => ReportStatus::Overdue,
    }
}

/// Convert a chrono::NaiveDate to time::Date.
pub fn to_date(date: NaiveDate) -> Result<Date, MonitoringError> {
    let month = time::Month::try_from(date.month() as u8)
        .map_err(|_| MonitoringError::backend(format!("Invalid month: {}", date.month())))?;
    Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| MonitoringError::backend(format!("Invalid date {}: {}", date, e)))
}

/// Convert a chrono UTC timestamp to time::OffsetDateTime.
pub fn to_timestamp(ts: DateTime<Utc>) -> Result<OffsetDateTime, MonitoringError> {
    let nanos = ts
        .timestamp_nanos_opt()
        .ok_or_else(|| MonitoringError::backend(format!("Timestamp out of range: {}", ts)))?;
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
        .map_err(|e| MonitoringError::backend(format!("Invalid timestamp {}: {}", ts, e)))
}

fn opt_date(date: Option<NaiveDate>) -> Result<Option<Date>, MonitoringError> {
    date.map(to_date).transpose()
}

fn progress_percent(progress: Option<i32>) -> u8 {
    progress.unwrap_or(0).clamp(0, 100) as u8
}

/// Convert a funded-project listing row to a domain Project.
pub fn to_domain_project(item: portal_client::FundedProject) -> Result<Project, MonitoringError> {
    let proposal = item.proposal.as_ref();
    let title = proposal
        .and_then(|p| p.project_title.clone())
        .unwrap_or_else(|| UNTITLED.to_string());

    let mut project = Project::new(item.id, title, to_domain_status(item.status))
        .with_dates(
            opt_date(proposal.and_then(|p| p.plan_start_date))?,
            opt_date(proposal.and_then(|p| p.plan_end_date))?,
        )
        .with_funded_date(opt_date(item.funded_date)?);

    if let Some(lead) = &item.project_lead {
        project = project.with_lead(item.project_lead_id.as_str(), lead.full_name());
    } else {
        project.lead_id = UserId::new(item.project_lead_id.as_str());
    }

    if let Some(proposal) = proposal {
        project.description = proposal.program_title.clone().unwrap_or_default();
        if let Some(department) = &proposal.department {
            project.department = department.name.clone();
        }
        if let Some(sector) = &proposal.sector {
            project.research_area = sector.name.clone();
        }
    }

    project.created_on = item.created_at.map(|ts| to_timestamp(ts).map(|t| t.date())).transpose()?;

    // Latest report by creation time carries the project's completion.
    let latest = item
        .project_reports
        .iter()
        .max_by_key(|r| r.created_at)
        .map(|r| progress_percent(r.progress));
    project.completion_percentage =
        latest.unwrap_or_else(|| progress_percent(item.completion_percentage));
    project.reports_count = item
        .reports_count
        .unwrap_or(item.project_reports.len());

    Ok(project)
}

/// Convert a project detail to a domain ProjectRecord.
pub fn to_domain_record(detail: portal_client::ProjectDetail) -> Result<ProjectRecord, MonitoringError> {
    let total_budget = detail.total_budget();
    let proposal = detail.proposal.as_ref();
    let title = proposal
        .and_then(|p| p.project_title.clone())
        .unwrap_or_else(|| UNTITLED.to_string());

    let lead_name = detail
        .project_lead
        .as_ref()
        .map(|lead| lead.full_name())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut project = Project::new(detail.id, title, to_domain_status(detail.status))
        .with_lead(detail.project_lead_id.as_str(), lead_name)
        .with_dates(
            opt_date(proposal.and_then(|p| p.plan_start_date))?,
            opt_date(proposal.and_then(|p| p.plan_end_date))?,
        )
        .with_funded_date(opt_date(detail.funded_date)?);

    if let Some(proposal) = proposal {
        project.description = proposal.program_title.clone().unwrap_or_default();
        if let Some(department) = &proposal.department {
            project.department = department.name.clone();
        }
        if let Some(sector) = &proposal.sector {
            project.research_area = sector.name.clone();
        }
    }
    project.created_on = detail
        .created_at
        .map(|ts| to_timestamp(ts).map(|t| t.date()))
        .transpose()?;

    project.completion_percentage = detail
        .project_reports
        .iter()
        .max_by_key(|r| r.created_at)
        .map(|r| progress_percent(r.progress))
        .unwrap_or(0);
    project.reports_count = detail.project_reports.len();

    let reports = detail
        .project_reports
        .into_iter()
        .map(|report| to_domain_report(report, &project.lead_id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProjectRecord {
        project,
        total_budget,
        reports,
    })
}

/// Names the project's active co-leads from its membership rows.
pub fn apply_members(record: &mut ProjectRecord, members: &[portal_client::ProjectMember]) {
    record.project.co_proponent = portal_client::co_lead_names(members);
}

/// Convert a backend report row to a PersistedReport.
///
/// Comments by the project lead or the report's submitter are attributed to
/// the proponent side; everyone else is an R&D officer.
pub fn to_domain_report(
    report: portal_client::ProjectReport,
    lead_id: &UserId,
) -> Result<PersistedReport, MonitoringError> {
    let submitter = report.submitted_by_proponent_id.map(UserId::from);

    let comments = report
        .project_comments
        .iter()
        .map(|comment| {
            let author_id = comment.author_id().map(UserId::from);
            let role = match &author_id {
                Some(author) if author == lead_id || Some(author) == submitter.as_ref() => {
                    AuthorRole::Proponent
                }
                _ => AuthorRole::RnD,
            };
            Comment {
                id: Some(comment.id),
                role,
                author_id,
                text: comment.comments.clone(),
                timestamp: None,
            }
        })
        .collect();

    let expenses = report
        .project_expenses
        .into_iter()
        .map(|expense| ExpenseItem {
            id: Some(expense.id),
            description: expense.description.unwrap_or_default(),
            amount: expense.expenses,
        })
        .collect();

    Ok(PersistedReport {
        id: ReportId::new(report.id),
        quarter: to_domain_quarter(report.quarterly_report),
        status: to_domain_report_status(report.status),
        progress: progress_percent(report.progress),
        expenses,
        proofs: report.report_file_url.unwrap_or_default(),
        note: report.comment.filter(|c| !c.trim().is_empty()),
        submitted_by: submitter,
        submitted_at: report.created_at.map(to_timestamp).transpose()?,
        comments,
    })
}
