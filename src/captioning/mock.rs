//! Mock captioner for testing.

use super::{CaptionError, Captioner};
use crate::models::ModelType;
use async_trait::async_trait;
use std::sync::Mutex;

enum Behaviour {
    Caption(String),
    Fail,
    Hang,
}

pub struct MockCaptioner {
    behaviour: Behaviour,
    calls: Mutex<Vec<ModelType>>,
}

impl MockCaptioner {
    /// Always answers with `caption`.
    pub fn new(caption: impl Into<String>) -> Self {
        Self::with(Behaviour::Caption(caption.into()))
    }

    /// Always fails as if the backend were down.
    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    /// Never answers, like a backend stuck loading a model.
    pub fn hanging() -> Self {
        Self::with(Behaviour::Hang)
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Models requested so far, in call order.
    pub fn calls(&self) -> Vec<ModelType> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Captioner for MockCaptioner {
    async fn caption(&self, _image: &[u8], model: ModelType) -> Result<String, CaptionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(model);
        }

        match &self.behaviour {
            Behaviour::Caption(caption) => Ok(caption.clone()),
            Behaviour::Fail => Err(CaptionError::Api(503, "mock captioner unavailable".to_string())),
            Behaviour::Hang => std::future::pending().await,
        }
    }
}
