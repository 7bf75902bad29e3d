//! Stability text-to-image API service

use std::time::Instant;

use base64::{prelude::BASE64_STANDARD, Engine};
use image::DynamicImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::error::SessionError;

/// Fixed diffusion parameters carried from the original UI.
pub const CFG_SCALE: u32 = 12;
pub const SAMPLES: u32 = 1;
pub const STEPS: u32 = 40;

/// Requested output resolution for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

/// Stability API request structure
#[derive(Debug, Serialize)]
struct GenerationApiRequest {
    text_prompts: Vec<TextPrompt>,
    cfg_scale: u32,
    samples: u32,
    steps: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
}

/// Stability API response structure
#[derive(Debug, Deserialize)]
struct GenerationApiResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
}

fn build_generation_url(base_url: &str, engine: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let base_url = base_url.strip_suffix("/v1").unwrap_or(base_url);
    format!("{}/v1/generation/{}/text-to-image", base_url, engine)
}

/// Call the Stability text-to-image endpoint and decode the returned bitmap.
///
/// Non-200 responses and transport failures (including timeouts) surface as
/// `SessionError::GenerationFailed`; the caller performs no gallery mutation
/// in that case.
pub async fn call_generation_endpoint(
    client: &Client,
    config: &Config,
    prompt: &str,
    params: GenerationParams,
) -> Result<DynamicImage, SessionError> {
    let api_key = config.api_key.as_deref().ok_or(SessionError::MissingCredential)?;

    let payload = GenerationApiRequest {
        text_prompts: vec![TextPrompt {
            text: prompt.to_string(),
        }],
        cfg_scale: CFG_SCALE,
        samples: SAMPLES,
        steps: STEPS,
        width: params.width,
        height: params.height,
    };

    let url = build_generation_url(&config.api_base_url, &config.engine);
    let start_time = Instant::now();

    info!("Calling generation API: {}", url);

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&payload)
        .send()
        .await
        .map_err(SessionError::from_transport)?;

    let status = response.status();
    let body_text = response
        .text()
        .await
        .map_err(SessionError::from_transport)?;

    let duration_ms = start_time.elapsed().as_millis() as u64;
    info!("Generation API call completed in {}ms ({})", duration_ms, status);

    if !status.is_success() {
        return Err(SessionError::GenerationFailed {
            status: status.as_u16(),
            body: body_text,
        });
    }

    decode_artifact(status.as_u16(), &body_text)
}

/// Pull `artifacts[0].base64` out of a success body and decode it to a bitmap.
fn decode_artifact(status: u16, body_text: &str) -> Result<DynamicImage, SessionError> {
    let api_response: GenerationApiResponse =
        serde_json::from_str(body_text).map_err(|e| SessionError::GenerationFailed {
            status,
            body: format!("failed to parse generation response: {}", e),
        })?;

    let artifact = api_response
        .artifacts
        .into_iter()
        .next()
        .ok_or_else(|| SessionError::GenerationFailed {
            status,
            body: "generation response contained no artifacts".to_string(),
        })?;

    let bytes = BASE64_STANDARD
        .decode(artifact.base64.as_bytes())
        .map_err(|e| SessionError::GenerationFailed {
            status,
            body: format!("invalid base64 image payload: {}", e),
        })?;

    image::load_from_memory(&bytes).map_err(|e| SessionError::GenerationFailed {
        status,
        body: format!("undecodable image payload: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_generation_url() {
        assert_eq!(
            build_generation_url("https://api.stability.ai", "stable-diffusion-xl-1024-v1-0"),
            "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image"
        );
        assert_eq!(
            build_generation_url("https://api.stability.ai/", "engine"),
            "https://api.stability.ai/v1/generation/engine/text-to-image"
        );
        assert_eq!(
            build_generation_url("https://api.stability.ai/v1", "engine"),
            "https://api.stability.ai/v1/generation/engine/text-to-image"
        );
    }

    #[test]
    fn test_decode_artifact_rejects_missing_artifacts() {
        let err = decode_artifact(200, r#"{"artifacts":[]}"#).unwrap_err();
        match err {
            SessionError::GenerationFailed { status, body } => {
                assert_eq!(status, 200);
                assert!(body.contains("no artifacts"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_artifact_rejects_bad_base64() {
        let err = decode_artifact(200, r#"{"artifacts":[{"base64":"!!!not-base64!!!"}]}"#)
            .unwrap_err();
        match err {
            SessionError::GenerationFailed { body, .. } => {
                assert!(body.contains("base64"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_artifact_round_trip() {
        // 1x1 white PNG produced by the image crate itself
        let img = DynamicImage::new_rgb8(1, 1);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        let body = format!(
            r#"{{"artifacts":[{{"base64":"{}"}}]}}"#,
            BASE64_STANDARD.encode(&bytes)
        );

        let decoded = decode_artifact(200, &body).unwrap();
        assert_eq!(decoded.width(), 1);
        assert_eq!(decoded.height(), 1);
    }
}
