use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::credential::Credential;
use crate::models::ratio::OutputRatio;
use crate::models::task::{
    CreateTaskResponse, GenerationTask, ReferenceImage, TaskStatus, TextToImageRequest,
};
use crate::services::cancel::CancelSignal;
use crate::services::prompt::MAX_PROMPT_CHARS;

const VERSION_HEADER: &str = "X-Runway-Version";

/// Seeds are drawn from `0..SEED_RANGE`.
const SEED_RANGE: u32 = 1_000_000;

/// Build the shared outbound HTTP client.
pub fn build_http_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.http_timeout())
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
}

/// One text_to_image submission.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Customer photo first, product photo second.
    pub reference_images: [String; 2],
    pub ratio: OutputRatio,
    pub model: String,
}

/// Client for Runway's asynchronous task API.
pub struct RunwayClient {
    http: Client,
    base_url: String,
    version: String,
    poll_interval: Duration,
    max_poll_attempts: Option<u32>,
}

impl RunwayClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.runway_api_base.trim_end_matches('/').to_string(),
            version: config.runway_version.clone(),
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.max_poll_attempts,
        }
    }

    /// Start a generation task and return its id.
    pub async fn submit(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<String, TaskError> {
        let body = TextToImageRequest {
            model: request.model.clone(),
            ratio: request.ratio.as_str().to_string(),
            prompt_text: truncate_chars(&request.prompt, MAX_PROMPT_CHARS).to_string(),
            reference_images: request
                .reference_images
                .iter()
                .map(|uri| ReferenceImage { uri: uri.clone() })
                .collect(),
            seed: rand::rng().random_range(0..SEED_RANGE),
        };

        let response = self
            .http
            .post(format!("{}/v1/text_to_image", self.base_url))
            .bearer_auth(credential.expose())
            .header(VERSION_HEADER, &self.version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(TaskError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreateTaskResponse = response.json().await?;
        info!(
            task_id = %created.id,
            model = %body.model,
            ratio = %body.ratio,
            seed = body.seed,
            "Runway task submitted"
        );
        Ok(created.id)
    }

    /// Fetch the current state of a task.
    pub async fn get_task(
        &self,
        task_id: &str,
        credential: &Credential,
    ) -> Result<GenerationTask, TaskError> {
        let response = self
            .http
            .get(format!("{}/v1/tasks/{}", self.base_url, task_id))
            .bearer_auth(credential.expose())
            .header(VERSION_HEADER, &self.version)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(TaskError::PollStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Poll a task at a fixed interval until it reaches a terminal state and
    /// return the first output URL.
    pub async fn poll(
        &self,
        task_id: &str,
        credential: &Credential,
        cancel: &CancelSignal,
    ) -> Result<String, TaskError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }
            attempt += 1;

            let task = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TaskError::Cancelled),
                task = self.get_task(task_id, credential) => task?,
            };
            metrics::counter!("tryon_poll_attempts_total").increment(1);
            info!(task_id, status = %task.status, attempt, "Runway task status");

            match task.status {
                TaskStatus::Succeeded => {
                    return task.output.into_iter().next().ok_or_else(|| {
                        TaskError::EmptyOutput {
                            task_id: task_id.to_string(),
                        }
                    });
                }
                TaskStatus::Failed | TaskStatus::Canceled => {
                    return Err(TaskError::GenerationFailed {
                        task_id: task_id.to_string(),
                        reason: task.failure_message(),
                    });
                }
                TaskStatus::Pending
                | TaskStatus::Throttled
                | TaskStatus::Running
                | TaskStatus::Unknown => {}
            }

            if let Some(max) = self.max_poll_attempts {
                if attempt >= max {
                    return Err(TaskError::Timeout {
                        task_id: task_id.to_string(),
                        attempts: attempt,
                    });
                }
            }

            debug!(
                task_id,
                wait_ms = self.poll_interval.as_millis() as u64,
                "Waiting before next status check"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TaskError::Cancelled),
                _ = sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Body of a rejected call. A body that cannot be read becomes empty.
async fn error_body(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status, error = %e, "Could not read Runway error body");
            String::new()
        }
    }
}

/// Longest prefix of `text` with at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Runway rejected the request (HTTP {status}): {body}")]
    Submission { status: u16, body: String },

    #[error("Runway task status check failed (HTTP {status}): {body}")]
    PollStatus { status: u16, body: String },

    #[error("Runway generation failed: {reason}")]
    GenerationFailed { task_id: String, reason: String },

    #[error("Runway task {task_id} succeeded but returned no images")]
    EmptyOutput { task_id: String },

    #[error("Runway task {task_id} did not finish after {attempts} status checks")]
    Timeout { task_id: String, attempts: u32 },

    #[error("Try-on was cancelled before the Runway task finished")]
    Cancelled,

    #[error("Runway request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
