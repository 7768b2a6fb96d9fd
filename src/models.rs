use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Which captioning model variant describes the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Base,
    Large,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Base => "base",
            ModelType::Large => "large",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(ModelType::Base),
            "large" => Ok(ModelType::Large),
            other => Err(format!("Invalid model type specified: {}", other)),
        }
    }
}

/// Parse the optional `temperature` form field.
///
/// Blank values fall back to the default; anything outside `0.0..=2.0` is
/// rejected.
pub fn parse_temperature(raw: Option<&str>) -> Result<f32, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_TEMPERATURE),
        Some(raw) => raw,
    };

    let value: f32 = raw
        .parse()
        .map_err(|_| format!("Invalid temperature: {}", raw))?;

    if !value.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&value) {
        return Err(format!(
            "Temperature must be between 0.0 and {}, got {}",
            MAX_TEMPERATURE, value
        ));
    }

    Ok(value)
}

/// An image pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub result: String,
}
