//! Hugging Face inference captioner (BLIP base / large).

use super::{CaptionError, Captioner};
use crate::config::CaptionerConfig;
use crate::models::ModelType;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

pub struct HuggingFaceCaptioner {
    endpoint: String,
    api_token: Option<String>,
    base_model: String,
    large_model: String,
    client: Client,
}

impl HuggingFaceCaptioner {
    pub fn new(config: &CaptionerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            base_model: config.base_model.clone(),
            large_model: config.large_model.clone(),
            client,
        })
    }

    fn model_id(&self, model: ModelType) -> &str {
        match model {
            ModelType::Base => &self.base_model,
            ModelType::Large => &self.large_model,
        }
    }

    fn model_url(&self, model: ModelType) -> String {
        format!("{}/models/{}", self.endpoint, self.model_id(model))
    }
}

#[async_trait]
impl Captioner for HuggingFaceCaptioner {
    async fn caption(&self, image: &[u8], model: ModelType) -> Result<String, CaptionError> {
        let encoded = general_purpose::STANDARD.encode(image);
        let url = self.model_url(model);

        tracing::debug!(
            model = %self.model_id(model),
            image_bytes = image.len(),
            "Sending image to caption backend"
        );

        let mut request = self
            .client
            .post(&url)
            .json(&InferenceRequest { inputs: &encoded });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CaptionError::Connection(self.endpoint.clone(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::Api(status.as_u16(), body));
        }

        let generated: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| CaptionError::InvalidResponse(e.to_string()))?;

        let caption = generated
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .unwrap_or_default();

        if caption.is_empty() {
            return Err(CaptionError::EmptyCaption);
        }

        Ok(caption)
    }
}
