use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: Option<OffsetDateTime>,
    /// Preview shown in the bubble; the server copy is the source of truth.
    pub image_data_url: Option<String>,
    /// Identifier returned by the upload endpoint.
    pub image_id: Option<String>,
}

impl ChatMessage {
    pub fn text(role: Role, content: impl Into<String>, created_at: Option<OffsetDateTime>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at,
            image_data_url: None,
            image_id: None,
        }
    }
}

/// A file held between selection and send. At most one exists per compose
/// session; it is replaced by the server image id once the upload succeeds.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingAttachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    InProgress,
    Ready,
    Failed,
}

impl ReportStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::InProgress => "In progress",
            ReportStatus::Ready => "Ready",
            ReportStatus::Failed => "Failed",
        }
    }
}

/// Backend-owned report record. The client keeps a cached copy that is
/// optimistically updated on create/delete and replaced on refetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub role: String,
    pub title: String,
    pub status: ReportStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}
