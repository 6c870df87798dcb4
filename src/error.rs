use thiserror::Error;

use crate::types::ReverbType;

/// Central error type for the stem-reverb-augment crate.
#[derive(Debug, Error)]
pub enum AugmentError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Unknown reverb type `{0}` (expected one of: small, medium, large)")]
    UnknownReverb(String),

    #[error("Failed to load {kind} impulse response from {path}")]
    ImpulseResponse {
        kind: ReverbType,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Impulse response {path} contains no samples")]
    EmptyImpulseResponse { path: String },

    #[error("Sample rate mismatch: reverb loaded at {expected} Hz, got {got} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("No stem files found in {dir}")]
    NoStems { dir: String },

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Config error: {0}")]
    Config(String),
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for AugmentError {
    fn from(e: std::io::Error) -> Self {
        AugmentError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for AugmentError {
    fn from(e: serde_json::Error) -> Self {
        AugmentError::Anyhow(e.into())
    }
}

impl From<toml::de::Error> for AugmentError {
    fn from(e: toml::de::Error) -> Self {
        AugmentError::Anyhow(e.into())
    }
}

impl From<tempfile::PersistError> for AugmentError {
    fn from(e: tempfile::PersistError) -> Self {
        AugmentError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, AugmentError>;
