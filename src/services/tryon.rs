use reqwest::Client;
use std::time::Instant;
use strum::Display;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::credential::Credential;
use crate::models::image::{ImageSource, NormalizedImage};
use crate::models::item::TryOnItem;
use crate::models::ratio::{select_ratio, OutputRatio};
use crate::services::cancel::CancelSignal;
use crate::services::normalizer::{ImageLoadError, ImageNormalizer};
use crate::services::prompt::{build_prompt, ModelSelection};
use crate::services::runway::{GenerationRequest, RunwayClient, TaskError};

/// Composes normalization, prompt synthesis and the Runway task lifecycle.
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance can serve any number of concurrent try-ons.
pub struct TryOnOrchestrator {
    normalizer: ImageNormalizer,
    runway: RunwayClient,
    models: ModelSelection,
}

/// Result of a completed try-on.
#[derive(Debug, Clone)]
pub struct TryOnOutcome {
    pub task_id: String,
    pub output_url: String,
    pub ratio: OutputRatio,
    pub model: String,
}

/// Which input image failed to load.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ImageRole {
    Base,
    Item,
}

impl TryOnOrchestrator {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            normalizer: ImageNormalizer::new(
                http.clone(),
                config.max_image_dimension,
                config.jpeg_quality,
                config.max_fetch_bytes,
            ),
            runway: RunwayClient::new(http, config),
            models: ModelSelection::from_config(config),
        }
    }

    /// Render `item` onto the customer photo and return the generated image URL.
    pub async fn perform_virtual_try_on(
        &self,
        base_image: &str,
        item: &TryOnItem,
        credential: &Credential,
        cancel: &CancelSignal,
    ) -> Result<TryOnOutcome, TryOnError> {
        let started = Instant::now();
        metrics::counter!("tryon_requests_total", "item_type" => item.item_type.to_string())
            .increment(1);

        let result = self.run(base_image, item, credential, cancel).await;

        match &result {
            Ok(outcome) => {
                metrics::histogram!("tryon_generation_seconds")
                    .record(started.elapsed().as_secs_f64());
                info!(
                    task_id = %outcome.task_id,
                    item = %item.name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Try-on complete"
                );
            }
            Err(e) => {
                metrics::counter!("tryon_requests_failed", "stage" => e.stage()).increment(1);
                warn!(item = %item.name, stage = e.stage(), error = %e, "Try-on failed");
            }
        }

        result
    }

    async fn run(
        &self,
        base_image: &str,
        item: &TryOnItem,
        credential: &Credential,
        cancel: &CancelSignal,
    ) -> Result<TryOnOutcome, TryOnError> {
        info!(item = %item.name, item_type = %item.item_type, "Normalizing reference images");
        let (base, product) = tokio::try_join!(
            self.load(ImageRole::Base, base_image),
            self.load(ImageRole::Item, &item.src),
        )?;

        let ratio = select_ratio(base.width, base.height);
        info!(
            width = base.width,
            height = base.height,
            ratio = %ratio,
            "Selected output ratio"
        );

        let request = GenerationRequest {
            prompt: build_prompt(item),
            reference_images: [base.data_uri, product.data_uri],
            ratio,
            model: self.models.model_for(item.item_type).to_string(),
        };

        let task_id = self
            .runway
            .submit(&request, credential)
            .await
            .map_err(TryOnError::Submit)?;

        let output_url = self
            .runway
            .poll(&task_id, credential, cancel)
            .await
            .map_err(TryOnError::Poll)?;

        Ok(TryOnOutcome {
            task_id,
            output_url,
            ratio,
            model: request.model,
        })
    }

    async fn load(&self, role: ImageRole, raw: &str) -> Result<NormalizedImage, TryOnError> {
        let source = ImageSource::parse(raw).ok_or_else(|| TryOnError::Normalize {
            image: role,
            source: ImageLoadError::InvalidSource(raw.chars().take(64).collect()),
        })?;
        self.normalizer
            .normalize(&source)
            .await
            .map_err(|source| TryOnError::Normalize { image: role, source })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    #[error("Failed to prepare {image} image: {source}")]
    Normalize {
        image: ImageRole,
        #[source]
        source: ImageLoadError,
    },

    #[error("Failed to start generation: {0}")]
    Submit(#[source] TaskError),

    #[error("Generation did not complete: {0}")]
    Poll(#[source] TaskError),
}

impl TryOnError {
    /// Pipeline stage that failed, for logs, metrics and API responses.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Normalize { .. } => "normalize",
            Self::Submit(_) => "submit",
            Self::Poll(_) => "poll",
        }
    }

    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            Self::Normalize { .. } => None,
            Self::Submit(e) | Self::Poll(e) => Some(e),
        }
    }
}
