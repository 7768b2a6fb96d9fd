//! Caption → prompt → completion pipeline for one uploaded image.

use crate::captioning::{prepare_image, CaptionError, Captioner};
use crate::completion::{ChatMessage, ChatRequest, CompletionProvider};
use crate::error::AppError;
use crate::models::ModelType;
use crate::prompt::{
    build_prompt, COMPLETION_API_FAILURE, COMPLETION_UNEXPECTED_FAILURE, SYSTEM_PROMPT,
};
use crate::storage::UploadStore;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Recommender {
    captioner: Arc<dyn Captioner>,
    completion: Arc<dyn CompletionProvider>,
}

impl Recommender {
    pub fn new(captioner: Arc<dyn Captioner>, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            captioner,
            completion,
        }
    }

    /// Caption the saved image and turn the caption into recommendations.
    ///
    /// Caption failures are errors. Completion failures are logged and
    /// replaced with a fixed message so the client still gets a `result`.
    pub async fn recommend(
        &self,
        store: &UploadStore,
        image_path: &Path,
        model: ModelType,
        temperature: f32,
    ) -> Result<String, AppError> {
        let raw = store.read(image_path).await?;
        let image_caption = self.describe(&raw, model).await?;

        tracing::info!(model = %model, caption = %image_caption, "Generated image caption");

        Ok(self.captions_and_music(&image_caption, temperature).await)
    }

    async fn describe(&self, raw: &[u8], model: ModelType) -> Result<String, AppError> {
        let jpeg = prepare_image(raw).map_err(|e| AppError::BadRequest(e.to_string()))?;

        self.captioner
            .caption(&jpeg, model)
            .await
            .map_err(|e| match e {
                CaptionError::InvalidImage(msg) => AppError::BadRequest(msg),
                other => {
                    tracing::error!(model = %model, error = %other, "Caption backend failed");
                    AppError::BadGateway(other.to_string())
                }
            })
    }

    async fn captions_and_music(&self, image_caption: &str, temperature: f32) -> String {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(image_caption)),
            ],
            temperature,
        };

        match self.completion.complete(&request).await {
            Ok(result) => result,
            Err(e) if e.is_api_failure() => {
                tracing::error!(error = %e, "Completion API error");
                COMPLETION_API_FAILURE.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "Unexpected completion error");
                COMPLETION_UNEXPECTED_FAILURE.to_string()
            }
        }
    }
}
