//! Prompt text sent to the completion model.

pub const SYSTEM_PROMPT: &str =
    "You are a creative assistant that provides catchy Instagram captions and music recommendations.";

/// Returned in place of a result when the completion API itself fails.
pub const COMPLETION_API_FAILURE: &str =
    "An error occurred while generating captions and music recommendations.";

/// Returned in place of a result for any other completion failure.
pub const COMPLETION_UNEXPECTED_FAILURE: &str =
    "An error occurred while processing your request.";

pub fn build_prompt(image_caption: &str) -> String {
    format!(
        "Based on the image description: '{}', generate three creative Instagram captions and suggest three songs that match the mood.",
        image_caption.trim()
    )
}
