//! Model Client abstraction and implementations.
//!
//! The upstream generative model is treated as an opaque, unreliable
//! network dependency behind the [`TextProvider`] trait, so handlers can
//! run against the real Gemini backend or a scripted mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error classes for provider calls. Handlers map these to HTTP statuses;
/// the provider itself never touches the HTTP layer.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection-level failure: the model endpoint could not be reached.
    #[error("Model service unreachable: {0}")]
    Unreachable(String),

    /// The provider rejected our credential (upstream HTTP 401).
    #[error("Unauthorized by model provider")]
    Unauthorized,

    /// The provider answered, but not with a usable shape (unparseable
    /// body, no candidates, or no text part).
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// Any other non-success status from the provider.
    #[error("Provider API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure after the connection was established.
    #[error("Network error: {0}")]
    Network(String),
}

/// A base64-encoded binary payload tagged with a MIME type, sent to the
/// model alongside the text prompt.
#[derive(Debug, Clone)]
pub struct InlinePart {
    pub data: String,
    pub mime_type: String,
}

/// Trait for text-generation providers (e.g. Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text from a prompt plus zero or more inline binary parts.
    async fn generate(&self, prompt: &str, parts: &[InlinePart])
        -> Result<String, ProviderError>;

    /// Health check against the provider endpoint.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
