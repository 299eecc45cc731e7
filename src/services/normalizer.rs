use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use reqwest::Client;
use tracing::debug;

use crate::models::image::{ImageSource, NormalizedImage};

/// Downscales and re-encodes reference images so request payloads stay small.
pub struct ImageNormalizer {
    http: Client,
    max_dimension: u32,
    quality: u8,
    max_fetch_bytes: usize,
}

impl ImageNormalizer {
    pub fn new(http: Client, max_dimension: u32, quality: u8, max_fetch_bytes: usize) -> Self {
        Self {
            http,
            max_dimension: max_dimension.max(1),
            quality: quality.clamp(1, 100),
            max_fetch_bytes,
        }
    }

    /// Load, bound and re-encode a source image as a JPEG data URI.
    pub async fn normalize(&self, source: &ImageSource) -> Result<NormalizedImage, ImageLoadError> {
        let bytes = self.load_bytes(source).await?;
        let max_dimension = self.max_dimension;
        let quality = self.quality;

        let normalized =
            tokio::task::spawn_blocking(move || transcode(&bytes, max_dimension, quality)).await??;

        debug!(
            source = %source,
            width = normalized.width,
            height = normalized.height,
            encoded_len = normalized.data_uri.len(),
            "Normalized reference image"
        );

        Ok(normalized)
    }

    async fn load_bytes(&self, source: &ImageSource) -> Result<Vec<u8>, ImageLoadError> {
        match source {
            ImageSource::DataUri(uri) => decode_data_uri(uri),
            ImageSource::Url(url) => {
                let mut response = self.http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ImageLoadError::FetchStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }

                let too_large = || ImageLoadError::FetchTooLarge {
                    url: url.clone(),
                    limit: self.max_fetch_bytes,
                };
                if response
                    .content_length()
                    .is_some_and(|len| len > self.max_fetch_bytes as u64)
                {
                    return Err(too_large());
                }

                // Content-Length may be absent or wrong; count what arrives.
                let mut bytes = Vec::new();
                while let Some(chunk) = response.chunk().await? {
                    if bytes.len() + chunk.len() > self.max_fetch_bytes {
                        return Err(too_large());
                    }
                    bytes.extend_from_slice(&chunk);
                }
                Ok(bytes)
            }
        }
    }
}

/// Dimensions that fit inside `max_dimension` on both axes while keeping the
/// aspect ratio. Images already inside the bound are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension || longer == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / longer as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    (scaled(width), scaled(height))
}

/// Decode, downscale, flatten onto white and encode as JPEG.
pub fn transcode(
    bytes: &[u8],
    max_dimension: u32,
    quality: u8,
) -> Result<NormalizedImage, ImageLoadError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageLoadError::Decode)?;
    let (width, height) = fit_within(decoded.width(), decoded.height(), max_dimension);

    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::CatmullRom)
    };
    let rgb = flatten_on_white(&resized);

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(encoder)
        .map_err(ImageLoadError::Encode)?;

    Ok(NormalizedImage {
        data_uri: format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&encoded)
        ),
        width,
        height,
    })
}

/// JPEG has no alpha channel; transparent product cut-outs go on white.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Extract the raw bytes from a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageLoadError> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| ImageLoadError::InvalidDataUri("missing ',' separator".to_string()))?;

    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(ImageLoadError::InvalidDataUri(
            "only base64-encoded data URIs are supported".to_string(),
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ImageLoadError::InvalidDataUri(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("Unsupported image source '{0}' (expected a data URI or http(s) URL)")]
    InvalidSource(String),

    #[error("Malformed image data URI: {0}")]
    InvalidDataUri(String),

    #[error("Could not load image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Could not load image: {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Could not load image: {url} is larger than {limit} bytes")]
    FetchTooLarge { url: String, limit: usize },

    #[error("Could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
