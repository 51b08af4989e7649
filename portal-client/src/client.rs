use std::time::Duration;

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{
        AddCommentPayload, AddExpensePayload, FundedProject, ProjectComment, ProjectDetail,
        ProjectExpense, ProjectMember, ProjectReport, SubmitReportPayload,
        UpdateProjectStatusPayload, VerifyReportPayload,
    },
    PortalURL,
};

/// REST client for the grants portal backend.
///
/// The backend wraps every payload as `{ "message": ..., "data": ... }`.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: PortalURL,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PortalFetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortalFetchError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: PortalURL::new(base_url),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: PortalURL) -> Result<T, PortalFetchError> {
        let resp = self
            .http
            .get(url.as_ref())
            .send()
            .await
            .map_err(|e| PortalFetchError::ResponseError(e.to_string()))?;

        Self::unwrap_envelope(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: PortalURL,
        body: &B,
    ) -> Result<T, PortalFetchError> {
        let resp = self
            .http
            .post(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| PortalFetchError::ResponseError(e.to_string()))?;

        Self::unwrap_envelope(resp).await
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, PortalFetchError> {
        let status = resp.status();
        if status.is_success() {
            let envelope = resp.json::<PortalResponse<T>>().await.map_err(|e| {
                PortalFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
            })?;
            return Ok(envelope.data);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(body);

        Err(PortalFetchError::from_status(status, message))
    }

    #[instrument(skip(self))]
    pub async fn fetch_funded_projects(
        &self,
        role: Option<&str>,
    ) -> Result<Vec<FundedProject>, PortalFetchError> {
        let mut url = self.base_url.append_path("/project/funded");
        if let Some(role) = role {
            url = url.with_query("role", role);
        }

        self.fetch(url).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_project(&self, project_id: i64) -> Result<ProjectDetail, PortalFetchError> {
        let url = self
            .base_url
            .append_path("/project/view")
            .with_query("project_id", project_id);

        self.fetch(url).await
    }

    /// Lead and co-lead memberships of a funded project.
    #[instrument(skip(self))]
    pub async fn fetch_project_members(
        &self,
        project_id: i64,
    ) -> Result<Vec<ProjectMember>, PortalFetchError> {
        let url = self
            .base_url
            .append_path("/project/members")
            .with_query("funded_project_id", project_id);

        self.fetch(url).await
    }

    #[instrument(skip(self, payload), fields(project_id = payload.funded_project_id, quarter = %payload.quarterly_report))]
    pub async fn submit_report(
        &self,
        payload: &SubmitReportPayload,
    ) -> Result<ProjectReport, PortalFetchError> {
        let url = self.base_url.append_path("/project/submit-report");
        self.post(url, payload).await
    }

    #[instrument(skip(self, payload), fields(report_id = payload.project_reports_id))]
    pub async fn add_expense(
        &self,
        payload: &AddExpensePayload,
    ) -> Result<ProjectExpense, PortalFetchError> {
        let url = self.base_url.append_path("/project/add-expense");
        self.post(url, payload).await
    }

    #[instrument(skip(self, payload), fields(report_id = payload.report_id))]
    pub async fn verify_report(&self, payload: &VerifyReportPayload) -> Result<(), PortalFetchError> {
        let url = self.base_url.append_path("/project/verify-report");
        let _: Option<serde_json::Value> = self.post(url, payload).await?;
        Ok(())
    }

    #[instrument(skip(self, payload), fields(report_id = payload.project_reports_id))]
    pub async fn add_comment(
        &self,
        payload: &AddCommentPayload,
    ) -> Result<ProjectComment, PortalFetchError> {
        let url = self.base_url.append_path("/project/add-comment");
        self.post(url, payload).await
    }

    #[instrument(skip(self, payload), fields(project_id = payload.project_id, status = %payload.status))]
    pub async fn update_project_status(
        &self,
        payload: &UpdateProjectStatusPayload,
    ) -> Result<(), PortalFetchError> {
        let url = self.base_url.append_path("/project/update-status");
        let _: Option<serde_json::Value> = self.post(url, payload).await?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PortalFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}

impl PortalFetchError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::BAD_REQUEST => Self::Rejected(message),
            _ => Self::ResponseError(format!("{}: {}", status, message)),
        }
    }
}

/// Success envelope returned by every portal endpoint.
#[derive(Debug, Deserialize)]
pub struct PortalResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Error bodies are either `{ message }` or `{ type: "validation_error", data: [issues] }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    data: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match (self.message, self.kind, self.data) {
            (Some(message), _, _) => Some(message),
            (None, Some(kind), Some(data)) => Some(format!("{}: {}", kind, data)),
            (None, Some(kind), None) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_fetch_errors() {
        assert!(matches!(
            PortalFetchError::from_status(StatusCode::FORBIDDEN, String::new()),
            PortalFetchError::Unauthorized
        ));
        assert!(matches!(
            PortalFetchError::from_status(StatusCode::CONFLICT, "dup".into()),
            PortalFetchError::Conflict(m) if m == "dup"
        ));
        assert!(matches!(
            PortalFetchError::from_status(StatusCode::BAD_GATEWAY, "down".into()),
            PortalFetchError::ResponseError(_)
        ));
    }

    #[test]
    fn validation_error_bodies_are_flattened() {
        let body: ErrorBody = serde_json::from_str(
            r#"{ "type": "validation_error", "data": [{ "path": ["progress"] }] }"#,
        )
        .expect("deserialize error body");
        let message = body.into_message().expect("message");
        assert!(message.starts_with("validation_error: "));
        assert!(message.contains("progress"));
    }

    #[test]
    fn envelope_exposes_data() {
        let resp: PortalResponse<Vec<i64>> =
            serde_json::from_str(r#"{ "message": "ok", "data": [1, 2] }"#).expect("envelope");
        assert_eq!(resp.data, vec![1, 2]);
        assert_eq!(resp.message.as_deref(), Some("ok"));
    }
}
