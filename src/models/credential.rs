use std::fmt;

use crate::config::AppConfig;

/// Prefix carried by every Runway API key.
const KEY_PREFIX: &str = "key_";

/// Bearer token for the Runway API. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate a user-supplied API key.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(CredentialError::Missing);
        }
        if !key.starts_with(KEY_PREFIX) || key.len() == KEY_PREFIX.len() {
            return Err(CredentialError::Malformed);
        }
        Ok(Self(key.to_string()))
    }

    /// Resolve the process-configured API key.
    pub fn from_config(config: &AppConfig) -> Result<Self, CredentialError> {
        match config.runway_api_key.as_deref() {
            Some(key) => Self::parse(key),
            None => Err(CredentialError::Missing),
        }
    }

    /// A request-supplied key wins over the configured one.
    pub fn resolve(supplied: Option<&str>, config: &AppConfig) -> Result<Self, CredentialError> {
        match supplied {
            Some(key) => Self::parse(key),
            None => Self::from_config(config),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}***)", &self.0[..KEY_PREFIX.len()])
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No Runway API key provided")]
    Missing,

    #[error("Invalid Runway API key (must start with key_)")]
    Malformed,
}
