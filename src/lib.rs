//! Thumbnail studio for YouTube creators
//!
//! Turns a video description into a thumbnail image via Gemini's image API,
//! then optionally enhances it by overlaying a title and channel logo through
//! a second edit call.

pub mod ai;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
