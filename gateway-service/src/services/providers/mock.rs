//! Mock provider implementation for testing.

use super::{InlinePart, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock should do on the next `generate` call.
pub enum MockBehavior {
    /// Echo back the canned reply.
    Reply(String),
    /// Fail with the scripted error.
    Fail(fn() -> ProviderError),
}

/// Scripted text provider for integration tests.
///
/// Records every call so tests can assert that validation failures never
/// reach the upstream model.
pub struct MockTextProvider {
    behavior: Mutex<MockBehavior>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_parts: Mutex<Vec<InlinePart>>,
}

impl MockTextProvider {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Reply(reply.into())),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_parts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Fail(error)),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_parts: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt from the most recent `generate` call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().expect("mock lock poisoned").clone()
    }

    /// Inline parts from the most recent `generate` call.
    pub fn last_parts(&self) -> Vec<InlinePart> {
        self.last_parts.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        parts: &[InlinePart],
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().expect("mock lock poisoned") = Some(prompt.to_string());
        *self.last_parts.lock().expect("mock lock poisoned") = parts.to_vec();

        match &*self.behavior.lock().expect("mock lock poisoned") {
            MockBehavior::Reply(reply) => {
                tracing::debug!(prompt_len = prompt.len(), "Mock provider replying");
                Ok(reply.clone())
            }
            MockBehavior::Fail(error) => Err(error()),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
