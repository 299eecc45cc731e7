use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000"). Unused by the CLI.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Runway API base URL (no trailing slash)
    #[serde(default = "default_runway_api_base")]
    pub runway_api_base: String,

    /// Runway API key used when a request does not carry its own
    #[serde(default)]
    pub runway_api_key: Option<String>,

    /// Value sent in the X-Runway-Version header
    #[serde(default = "default_runway_version")]
    pub runway_version: String,

    /// Model id used for clothing items
    #[serde(default = "default_garment_model")]
    pub garment_model: String,

    /// Model id used for necklaces, earrings and sets
    #[serde(default = "default_jewelry_model")]
    pub jewelry_model: String,

    /// Longest side, in pixels, of images sent as references
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    /// JPEG quality (1-100) for re-encoded reference images
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Largest remote image body, in bytes, the normalizer will download
    #[serde(default = "default_max_fetch_bytes")]
    pub max_fetch_bytes: usize,

    /// Delay between task status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up after this many status checks. Unset polls until a terminal state.
    #[serde(default)]
    pub max_poll_attempts: Option<u32>,

    /// Per-request timeout for outbound HTTP calls
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_runway_api_base() -> String {
    "https://api.dev.runwayml.com".to_string()
}

fn default_runway_version() -> String {
    "2024-11-06".to_string()
}

fn default_garment_model() -> String {
    "gen4_image".to_string()
}

fn default_jewelry_model() -> String {
    "gemini_2.5_flash".to_string()
}

fn default_max_image_dimension() -> u32 {
    1536
}

fn default_jpeg_quality() -> u8 {
    95
}

fn default_max_fetch_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_http_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            runway_api_base: default_runway_api_base(),
            runway_api_key: None,
            runway_version: default_runway_version(),
            garment_model: default_garment_model(),
            jewelry_model: default_jewelry_model(),
            max_image_dimension: default_max_image_dimension(),
            jpeg_quality: default_jpeg_quality(),
            max_fetch_bytes: default_max_fetch_bytes(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: None,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
