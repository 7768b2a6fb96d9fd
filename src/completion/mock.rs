//! Mock completion provider for testing.

use super::{ChatRequest, CompletionError, CompletionProvider};
use async_trait::async_trait;
use std::sync::Mutex;

enum Behaviour {
    Echo,
    Fixed(String),
    Fail(fn() -> CompletionError),
}

pub struct MockCompletion {
    behaviour: Behaviour,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockCompletion {
    /// Answers with `Mock response for: <last user message>`.
    pub fn echo() -> Self {
        Self::with(Behaviour::Echo)
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with(Behaviour::Fixed(text.into()))
    }

    /// Fails every call with the error produced by `make_error`.
    pub fn failing(make_error: fn() -> CompletionError) -> Self {
        Self::with(Behaviour::Fail(make_error))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behaviour {
            Behaviour::Echo => {
                let prompt = request
                    .messages
                    .last()
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                Ok(format!("Mock response for: {}", prompt))
            }
            Behaviour::Fixed(text) => Ok(text.clone()),
            Behaviour::Fail(make_error) => Err(make_error()),
        }
    }
}
