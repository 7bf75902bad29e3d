//! Error types for session and enhancer operations

use thiserror::Error;

/// Errors surfaced by [`crate::ImageSession`] operations.
///
/// Transport-level failures (connect errors, timeouts) are folded into
/// `GenerationFailed` with status 0 so callers handle a single failure path
/// for the remote call.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No API key configured; generate cannot proceed.
    #[error("missing Stability API key (set STABILITY_API_KEY or pass --api-key)")]
    MissingCredential,

    /// The remote synthesis call did not yield a usable image.
    #[error("generation failed (HTTP {status}): {body}")]
    GenerationFailed { status: u16, body: String },

    /// An image was requested that the session does not hold: an export of a
    /// missing gallery entry, or variations/upscale before any successful
    /// generation (callers normally gate the latter on `has_image()`).
    #[error("no source image available")]
    NoSourceImage,
}

impl SessionError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let body = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        SessionError::GenerationFailed { status: 0, body }
    }
}

/// Errors surfaced by the prompt enhancer.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// The local text-generation model could not be reached or failed to run.
    /// Callers fall back to the unmodified idea text.
    #[error("enhancer model unavailable: {0}")]
    ModelUnavailable(String),
}
