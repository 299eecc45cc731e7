use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a Runway generation task, as reported by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Throttled,
    Running,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Terminal states end polling unconditionally.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Body of `GET /v1/tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTask {
    pub status: TaskStatus,
    #[serde(default)]
    pub output: Vec<String>,
    pub failure_reason: Option<String>,
    pub error: Option<String>,
}

impl GenerationTask {
    /// Human-readable failure cause: the server's reason, then its error
    /// string, then the bare status name.
    pub fn failure_message(&self) -> String {
        self.failure_reason
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.status.to_string())
    }
}

/// A reference image entry in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceImage {
    pub uri: String,
}

/// Body of `POST /v1/text_to_image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageRequest {
    pub model: String,
    pub ratio: String,
    pub prompt_text: String,
    pub reference_images: Vec<ReferenceImage>,
    pub seed: u32,
}

/// Response to a successful task submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskResponse {
    pub id: String,
}
