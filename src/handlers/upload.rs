use crate::error::AppError;
use crate::models::{parse_temperature, ModelType, RecommendationResponse, UploadedImage};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;

const IMAGE_FIELD: &str = "image";
const TEMPERATURE_FIELD: &str = "temperature";
const MODEL_TYPE_FIELD: &str = "model_type";

#[derive(Debug, Default)]
struct UploadForm {
    image: Option<UploadedImage>,
    temperature: Option<String>,
    model_type: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                if !data.is_empty() {
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            Some(TEMPERATURE_FIELD) => {
                form.temperature = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(MODEL_TYPE_FIELD) => {
                form.model_type = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

fn parse_model_type(raw: Option<&str>) -> Result<ModelType, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(ModelType::default()),
        Some(raw) => raw.parse().map_err(AppError::BadRequest),
    }
}

/// `POST /upload`: caption the image, then ask for captions and songs.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RecommendationResponse>, AppError> {
    let start = Instant::now();
    let form = read_form(&mut multipart).await?;

    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("No image uploaded".to_string()))?;
    let temperature =
        parse_temperature(form.temperature.as_deref()).map_err(AppError::BadRequest)?;
    let model = parse_model_type(form.model_type.as_deref())?;

    tracing::info!(
        file_name = %image.file_name,
        content_type = image.content_type.as_deref().unwrap_or("unknown"),
        bytes = image.data.len(),
        model = %model,
        temperature,
        "Received image upload"
    );

    // Dropping the guard deletes the file, on success, error or cancellation.
    let upload = state.store.save(&image.file_name, &image.data).await?;
    let result = state
        .recommender
        .recommend(&state.store, upload.path(), model, temperature)
        .await?;
    drop(upload);

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Recommendations generated"
    );

    Ok(Json(RecommendationResponse { result }))
}
