//! Wire DTOs for the gateway endpoints.
//!
//! Field names are camelCase on the wire to match the existing browser
//! client (`generatedText`, `audioFormat`, ...).

use serde::{Deserialize, Serialize};

/// Body of `POST /generate-text`.
///
/// `prompt` is kept as raw JSON so a non-string value is rejected by the
/// handler with a controlled 400 instead of a framework deserialization
/// error.
#[derive(Debug, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextResponse {
    pub generated_text: String,
}

/// Success body of the image and document endpoints.
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResponse {
    pub transcript: String,
    pub audio_format: String,
}

/// Error body of the file-accepting endpoints. The supported-type lists
/// are advisory hints, not enforced limits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_docs: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<&'static [&'static str]>,
}

impl GenerationFailure {
    pub fn new(error: String) -> Self {
        Self {
            error,
            supported_docs: None,
            supported_formats: None,
        }
    }

    pub fn with_supported_docs(error: String, docs: &'static [&'static str]) -> Self {
        Self {
            error,
            supported_docs: Some(docs),
            supported_formats: None,
        }
    }

    pub fn with_supported_formats(error: String, formats: &'static [&'static str]) -> Self {
        Self {
            error,
            supported_docs: None,
            supported_formats: Some(formats),
        }
    }
}
