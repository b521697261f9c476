//! Data models and structures
//!
//! Defines the logo attachment record and the environment-backed
//! configuration used to wire up the Gemini clients.

use serde::{Deserialize, Serialize};

/// Channel logo attached to an enhance request.
///
/// Set once per file selection; a fresh generate clears it, since a new
/// thumbnail invalidates any prior enhancement context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Logo {
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl Logo {
    pub fn new(data: Vec<u8>, filename: String, mime_type: String) -> Self {
        Self {
            data,
            filename,
            mime_type,
        }
    }
}

const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub image_model: String,
    pub edit_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        // A missing .env file is fine; a malformed one is not.
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Validation("GEMINI_API_KEY not set".to_string()))?,
            image_model: std::env::var("THUMBSMITH_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            edit_model: std::env::var("THUMBSMITH_EDIT_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
        })
    }
}
