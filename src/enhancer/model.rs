//! Text-generation model seam and the local completion-server client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EnhanceError;

/// A local text-generation model: given a prompt and an output cap, returns
/// the first generated continuation. Implementations are expected to echo or
/// not echo the prompt at their own discretion; post-processing is the
/// caller's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, EnhanceError>;
}

/// Completion request for a llama.cpp-style local server
#[derive(Debug, Serialize)]
struct CompletionRequest {
    prompt: String,
    n_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Client for a local text-generation server exposing a `/completion`
/// endpoint (llama.cpp server wire format). Built once and reused; the
/// server-side model load is the one-time initialization cost.
pub struct CompletionServer {
    client: Client,
    base_url: String,
}

impl CompletionServer {
    pub fn new(base_url: &str) -> Result<Self, EnhanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EnhanceError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for CompletionServer {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, EnhanceError> {
        let url = format!("{}/completion", self.base_url);

        info!("Calling local completion server: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&CompletionRequest {
                prompt: prompt.to_string(),
                n_predict: max_new_tokens,
                temperature: 0.7,
            })
            .send()
            .await
            .map_err(|e| EnhanceError::ModelUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnhanceError::ModelUnavailable(format!(
                "completion server returned {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::ModelUnavailable(e.to_string()))?;

        Ok(completion.content)
    }
}
