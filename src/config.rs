use crate::error::AppError;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use std::env;

const DEFAULT_HF_ENDPOINT: &str = "https://api-inference.huggingface.co";
const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub captioner: CaptionerConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionerConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub base_model: String,
    pub large_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Load from `configuration.*` and `APP__` prefixed variables.
    ///
    /// `OPENAI_API_KEY` and `HF_API_TOKEN` fill in credentials that were not
    /// set through the `APP__` namespace.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("configuration").required(false))
            .add_source(app_environment())
            .build()?;

        Self::finish(config, non_empty_env)
    }

    /// Load from defaults plus the given environment source, resolving
    /// fallback credentials through `credential`.
    pub fn load_from(
        env: Environment,
        credential: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let config = Self::defaults()?.add_source(env).build()?;
        Self::finish(config, credential)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(Cfg::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("upload_dir", "uploads")?
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("log_format", "pretty")?
            .set_default("captioner.endpoint", DEFAULT_HF_ENDPOINT)?
            .set_default("captioner.base_model", "Salesforce/blip-image-captioning-base")?
            .set_default("captioner.large_model", "Salesforce/blip-image-captioning-large")?
            .set_default("captioner.timeout_secs", 120)?
            .set_default("completion.endpoint", DEFAULT_OPENAI_ENDPOINT)?
            .set_default("completion.model", "gpt-4o")?
            .set_default("completion.max_tokens", 500)?
            .set_default("completion.timeout_secs", 60)?)
    }

    fn finish(
        config: Cfg,
        credential: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let mut app: AppConfig = config.try_deserialize()?;
        app.fill_credentials(credential);
        app.validate()?;
        Ok(app)
    }

    fn fill_credentials(&mut self, credential: impl Fn(&str) -> Option<String>) {
        self.completion.api_key = non_blank(self.completion.api_key.take())
            .or_else(|| credential("OPENAI_API_KEY"));
        self.captioner.api_token = non_blank(self.captioner.api_token.take())
            .or_else(|| credential("HF_API_TOKEN"));
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.completion.api_key.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY (or APP__COMPLETION__API_KEY) is required but not set"
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "max_upload_bytes must be greater than zero"
            )));
        }
        Ok(())
    }
}

/// The `APP__` namespace, e.g. `APP__COMPLETION__MODEL` → `completion.model`.
pub fn app_environment() -> Environment {
    Environment::with_prefix("APP").separator("__")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_env(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}
