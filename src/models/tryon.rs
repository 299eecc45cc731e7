use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::item::TryOnItem;

/// Request body for `POST /api/v1/try-on`.
#[derive(Debug, Deserialize, Validate)]
pub struct TryOnRequest {
    /// Customer photo as a data URI or http(s) URL.
    #[garde(length(min = 1))]
    pub base_image: String,

    #[garde(dive)]
    pub item: TryOnItem,

    /// Overrides the configured Runway key for this request.
    #[garde(length(min = 1, max = 512))]
    pub api_key: Option<String>,
}

/// Response after a successful try-on.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub request_id: uuid::Uuid,
    pub task_id: String,
    pub output_url: String,
    pub ratio: String,
    pub model: String,
}

/// Response when a try-on fails at any stage.
#[derive(Debug, Serialize)]
pub struct TryOnErrorResponse {
    pub request_id: uuid::Uuid,
    pub stage: String,
    pub error: String,
}
