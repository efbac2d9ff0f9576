//! Gemini `generateContent` client for the narrative analysis.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{normalize_gemini_model, Config};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing API key; set GEMINI_API_KEY or analysis.api_key in config.toml")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,
}

/// Everything a single analysis call needs, resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

impl AnalysisConfig {
    /// Merge file config, an optional `--model` override, and the key from
    /// the environment (which wins over the file).
    pub fn resolve(cfg: &Config, model: Option<&str>, env_key: Option<String>) -> Self {
        let a = &cfg.analysis;
        let api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| a.api_key.clone().filter(|k| !k.trim().is_empty()));

        Self {
            model: normalize_gemini_model(model.unwrap_or(a.model.as_str())),
            base_url: a.base_url.trim_end_matches('/').to_string(),
            api_key,
            temperature: a.temperature,
            max_output_tokens: a.max_output_tokens,
            timeout: Duration::from_secs(a.timeout_secs),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

fn request_body(config: &AnalysisConfig, prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    }
}

/// Text of the first candidate, parts concatenated.
fn response_text(resp: GenerateResponse) -> Result<String, AnalysisError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AnalysisError::Blocked(reason));
    }
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Send `prompt` and return the model's text unmodified.
    pub async fn generate(&self, config: &AnalysisConfig, prompt: &str) -> Result<String, AnalysisError> {
        let key = config.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        info!(model = %config.model, prompt_bytes = prompt.len(), "requesting analysis");
        let resp = self
            .client
            .post(config.endpoint())
            .header("x-goog-api-key", key)
            .json(&request_body(config, prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let out: GenerateResponse = resp.json().await?;
        debug!(candidates = out.candidates.len(), "analysis response");
        response_text(out)
    }
}
