//! Gemini Model Client implementation.
//!
//! Posts `generateContent` requests to Google's Generative Language API
//! and extracts the first candidate's text.

use super::{InlinePart, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, self.config.model, method, self.config.api_key
        )
    }

    fn classify_transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_connect() {
            ProviderError::Unreachable(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        parts: &[InlinePart],
    ) -> Result<String, ProviderError> {
        // Prompt first, then the binary parts, matching the order callers
        // of the API expect.
        let mut content_parts = vec![ContentPart::Text {
            text: prompt.to_string(),
        }];
        content_parts.extend(parts.iter().map(|part| ContentPart::InlineData {
            inline_data: InlineData {
                mime_type: part.mime_type.clone(),
                data: part.data.clone(),
            },
        }));

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: content_parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
            }),
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            part_count = parts.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(ProviderError::Unauthorized);
            }

            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("Failed to parse response: {}", e)))?;

        extract_text(&api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::Unauthorized);
        }

        let url = format!("{}/models?key={}", GEMINI_API_BASE, self.config.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Api {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            })
        }
    }
}

/// Pull the first candidate's first text part, guarding against the
/// shapes the API is known to return on partial failures.
fn extract_text(response: &GenerateContentResponse) -> Result<String, ProviderError> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .and_then(|p| match p {
            ContentPart::Text { text } => Some(text.clone()),
            _ => None,
        })
        .ok_or_else(|| ProviderError::Malformed("Response contains no text candidate".to_string()))
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_inline_data_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    ContentPart::Text {
                        text: "Describe the image".to_string(),
                    },
                    ContentPart::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "aGVsbG8=".to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.5),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Describe the image");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn extract_text_returns_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hi there" }] } }
            ]
        }))
        .unwrap();

        assert_eq!(extract_text(&response).unwrap(), "Hi there");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();

        assert!(matches!(
            extract_text(&response),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn extract_text_rejects_non_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "inline_data": { "mimeType": "image/png", "data": "" } }]
                }
            }]
        }))
        .unwrap();

        assert!(matches!(
            extract_text(&response),
            Err(ProviderError::Malformed(_))
        ));
    }
}
