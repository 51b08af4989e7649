use std::{error::Error, time::Duration};

use portal_client::{PortalClient, PortalURL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::from_filename(".env.local").ok();

    let base_url = PortalURL::from_env().ok_or("PORTAL_URL must be set in env")?;
    let client = PortalClient::new(base_url.as_ref(), Duration::from_secs(15))?;

    let projects = client.fetch_funded_projects(Some("rnd")).await?;
    for project in projects {
        let title = project
            .proposal
            .as_ref()
            .and_then(|p| p.project_title.clone())
            .unwrap_or_else(|| "Untitled Project".to_string());
        println!(
            "PROJ-{}: {} [{}] {} report(s)",
            project.id,
            title,
            project.status,
            project.project_reports.len()
        );

        let detail = client.fetch_project(project.id).await?;
        println!("  grant: {}", detail.total_budget());
        for report in &detail.project_reports {
            let spent: rust_decimal::Decimal =
                report.project_expenses.iter().map(|e| e.expenses).sum();
            println!(
                "  {} {} progress={}% spent={}",
                report.quarterly_report,
                report.status,
                report.progress.unwrap_or_default(),
                spent
            );
        }
    }

    Ok(())
}
