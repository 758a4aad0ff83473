//! Thin client for the reports backend and the agent upload endpoint.
//!
//! Every endpoint speaks JSON with a `{success, ...}` envelope. There are no
//! retries and no request timeouts; a failed call is reported to the caller
//! and the UI decides what, if anything, to show.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PendingAttachment, Report};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct ReportsApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ReportListEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    reports: Vec<Report>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ReportEnvelope {
    #[serde(default)]
    success: bool,
    report: Option<Report>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct CreateReportRequest<'a> {
    role: &'a str,
}

fn envelope_error(error: Option<String>, status: reqwest::StatusCode) -> ApiError {
    ApiError::Rejected(error.unwrap_or_else(|| format!("reports API error {status}")))
}

impl ReportsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn list_reports(&self) -> ApiResult<Vec<Report>> {
        let res = self.client.get(self.url("/api/reports")).send().await?;
        let status = res.status();
        let body = res.text().await?;
        let envelope: ReportListEnvelope = serde_json::from_str(&body)?;
        if envelope.success {
            Ok(envelope.reports)
        } else {
            Err(envelope_error(envelope.error, status))
        }
    }

    pub async fn create_report(&self, role: &str) -> ApiResult<Report> {
        let res = self
            .client
            .post(self.url("/api/reports"))
            .json(&CreateReportRequest { role })
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        let envelope: ReportEnvelope = serde_json::from_str(&body)?;
        match (envelope.success, envelope.report) {
            (true, Some(report)) => Ok(report),
            (_, _) => Err(envelope_error(envelope.error, status)),
        }
    }

    pub async fn get_report(&self, id: &str) -> ApiResult<Report> {
        let res = self
            .client
            .get(self.url(&format!("/api/reports/{id}")))
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        let envelope: ReportEnvelope = serde_json::from_str(&body)?;
        match (envelope.success, envelope.report) {
            (true, Some(report)) => Ok(report),
            (_, _) => Err(envelope_error(envelope.error, status)),
        }
    }

    pub async fn delete_report(&self, id: &str) -> ApiResult<()> {
        let res = self
            .client
            .delete(self.url(&format!("/api/reports/{id}")))
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        let envelope: AckEnvelope = serde_json::from_str(&body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(envelope_error(envelope.error, status))
        }
    }
}

// ---------------
// Agent service upload
// ---------------

#[derive(Deserialize)]
struct UploadResponse {
    image_id: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Multipart upload of a validated attachment. Returns the server image id.
pub async fn upload_chat_image(
    agent_service_url: &str,
    attachment: &PendingAttachment,
) -> ApiResult<String> {
    let part = reqwest::multipart::Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime)?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let url = format!(
        "{}/v1/chat/upload",
        agent_service_url.trim_end_matches('/')
    );
    let res = reqwest::Client::new().post(url).multipart(form).send().await?;
    let status = res.status();
    let body = res.text().await?;
    let parsed: UploadResponse = serde_json::from_str(&body)?;
    match parsed.image_id {
        Some(id) => Ok(id),
        None => Err(ApiError::Rejected(
            parsed
                .detail
                .unwrap_or_else(|| format!("upload failed with status {status}")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_parses() {
        let body = r#"{"success": true, "reports": [
            {"id": "r1", "role": "finops", "title": "Weekly spend",
             "status": "ready", "created_at": "2026-08-01T10:00:00Z"}
        ]}"#;
        let envelope: ReportListEnvelope = serde_json::from_str(body).expect("parse");
        assert!(envelope.success);
        assert_eq!(envelope.reports.len(), 1);
    }

    #[test]
    fn failed_envelope_carries_error() {
        let body = r#"{"success": false, "error": "role unknown"}"#;
        let envelope: ReportEnvelope = serde_json::from_str(body).expect("parse");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("role unknown"));
    }

    #[test]
    fn upload_response_accepts_both_shapes() {
        let ok: UploadResponse =
            serde_json::from_str(r#"{"image_id": "img-9"}"#).expect("parse");
        assert_eq!(ok.image_id.as_deref(), Some("img-9"));

        let err: UploadResponse =
            serde_json::from_str(r#"{"image_id": null, "detail": "too large"}"#).expect("parse");
        assert!(err.image_id.is_none());
        assert_eq!(err.detail.as_deref(), Some("too large"));
    }
}
