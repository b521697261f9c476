//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image generation failed: {0}")]
    Generation(String),

    #[error("Image edit failed: {0}")]
    Edit(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    /// Collapse a lower-level failure into the generation error kind.
    ///
    /// Applied at the `ImageGenerationService` boundary so callers only ever
    /// see generation-kind failures from the generate call.
    pub(crate) fn into_generation(self) -> Self {
        match self {
            Error::Generation(_) => self,
            other => Error::Generation(other.to_string()),
        }
    }

    /// Collapse a lower-level failure into the edit error kind.
    pub(crate) fn into_edit(self) -> Self {
        match self {
            Error::Edit(_) => self,
            other => Error::Edit(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
