//! Gemini `generateContent` client for firmware generation.

use async_trait::async_trait;
use domain::services::{FirmwareError, FirmwareGenerator, FirmwarePrompt, GeneratedFirmware};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::config::FirmwareConfig;

pub struct GeminiFirmwareGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiFirmwareGenerator {
    pub fn new(config: &FirmwareConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    fn request_body<'a>(prompt: &'a FirmwarePrompt) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &prompt.system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part {
                    text: &prompt.prompt,
                }],
            }],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "code": { "type": "STRING" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["code", "explanation"]
                }
            }),
        }
    }
}

/// Pulls the JSON payload out of the first candidate's text parts.
fn parse_reply(reply: GenerateContentResponse) -> Result<GeneratedFirmware, FirmwareError> {
    let text: String = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(FirmwareError::InvalidResponse(
            "reply contained no text".to_string(),
        ));
    }

    let firmware: GeneratedFirmware = serde_json::from_str(text)
        .map_err(|e| FirmwareError::InvalidResponse(format!("reply is not the expected JSON: {}", e)))?;

    if firmware.code.trim().is_empty() {
        return Err(FirmwareError::InvalidResponse("reply has empty code".to_string()));
    }
    Ok(firmware)
}

#[async_trait]
impl FirmwareGenerator for GeminiFirmwareGenerator {
    async fn generate(&self, prompt: &FirmwarePrompt) -> Result<GeneratedFirmware, FirmwareError> {
        let start = Instant::now();
        debug!(endpoint = %self.endpoint, prompt_len = prompt.prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                let cause = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                };
                error!(error = %cause, "Gemini request failed");
                FirmwareError::Upstream(cause)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Gemini returned an error status");
            return Err(FirmwareError::Upstream(format!("status {}", status)));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FirmwareError::InvalidResponse(e.to_string()))?;

        let firmware = parse_reply(reply)?;
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            code_len = firmware.code.len(),
            "Gemini generation complete"
        );
        Ok(firmware)
    }
}
