use std::fmt;

/// Where a source image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline `data:<mime>;base64,<payload>` URI.
    DataUri(String),
    /// Remote http(s) URL.
    Url(String),
}

impl ImageSource {
    /// Classify a caller-supplied image reference. Returns `None` for anything
    /// that is neither a data URI nor an http(s) URL.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if has_prefix(trimmed, "data:") {
            Some(Self::DataUri(trimmed.to_string()))
        } else if has_prefix(trimmed, "http://") || has_prefix(trimmed, "https://") {
            Some(Self::Url(trimmed.to_string()))
        } else {
            None
        }
    }
}

/// ASCII case-insensitive prefix check that only looks at the prefix bytes.
fn has_prefix(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Payloads run to megabytes; only show the header.
            Self::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or_default();
                write!(f, "{header},...")
            }
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// A downscaled, re-encoded image ready to send as a reference.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}
