mod common;

use axum::http::StatusCode;
use caption_recommender::captioning::mock::MockCaptioner;
use caption_recommender::completion::mock::MockCompletion;
use caption_recommender::completion::CompletionError;
use caption_recommender::models::ModelType;
use caption_recommender::prompt::{build_prompt, COMPLETION_API_FAILURE};
use common::{json_body, png_bytes, spawn_app, spawn_app_with_limit, upload_request, Part};
use tower::util::ServiceExt;

fn image_part(data: &[u8]) -> Part<'_> {
    Part::File {
        name: "image",
        file_name: "beach.png",
        content_type: "image/png",
        data,
    }
}

#[tokio::test]
async fn upload_returns_result_for_valid_image() {
    let app = spawn_app(
        MockCaptioner::new("a dog running on the beach"),
        MockCompletion::fixed("1. Paws and waves\n2. Sandy zoomies\n3. Salt & fur"),
    )
    .await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&png)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["result"],
        "1. Paws and waves\n2. Sandy zoomies\n3. Salt & fur"
    );

    let requests = app.completion.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.7);
    assert_eq!(
        requests[0].messages[1].content,
        build_prompt("a dog running on the beach")
    );
    assert_eq!(app.captioner.calls(), vec![ModelType::Base]);
}

#[tokio::test]
async fn upload_without_image_is_bad_request() {
    let app = spawn_app(MockCaptioner::new("unused"), MockCompletion::echo()).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[Part::Text("temperature", "0.5")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No image uploaded");
    assert!(app.captioner.calls().is_empty());
    assert!(app.completion.requests().is_empty());
}

#[tokio::test]
async fn upload_with_empty_file_is_bad_request() {
    let app = spawn_app(MockCaptioner::new("unused"), MockCompletion::echo()).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&[])]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_forwards_model_type_and_temperature() {
    let app = spawn_app(MockCaptioner::new("mountain lake"), MockCompletion::echo()).await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[
            Part::Text("model_type", "large"),
            Part::Text("temperature", "1.2"),
            image_part(&png),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["result"],
        format!("Mock response for: {}", build_prompt("mountain lake"))
    );
    assert_eq!(app.captioner.calls(), vec![ModelType::Large]);
    assert_eq!(app.completion.requests()[0].temperature, 1.2);
}

#[tokio::test]
async fn upload_rejects_unknown_model_type() {
    let app = spawn_app(MockCaptioner::new("unused"), MockCompletion::echo()).await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[
            image_part(&png),
            Part::Text("model_type", "gigantic"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.captioner.calls().is_empty());
}

#[tokio::test]
async fn upload_rejects_invalid_temperature() {
    let app = spawn_app(MockCaptioner::new("unused"), MockCompletion::echo()).await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[
            image_part(&png),
            Part::Text("temperature", "very hot"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_non_image_file() {
    let app = spawn_app(MockCaptioner::new("unused"), MockCompletion::echo()).await;

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[Part::File {
            name: "image",
            file_name: "notes.txt",
            content_type: "text/plain",
            data: b"shopping list",
        }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.captioner.calls().is_empty());
}

#[tokio::test]
async fn completion_failure_still_returns_ok_with_generic_message() {
    let app = spawn_app(
        MockCaptioner::new("birthday cake"),
        MockCompletion::failing(|| CompletionError::Api(500, "upstream exploded".into())),
    )
    .await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&png)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], COMPLETION_API_FAILURE);
}

#[tokio::test]
async fn caption_failure_is_bad_gateway() {
    let app = spawn_app(MockCaptioner::failing(), MockCompletion::echo()).await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&png)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.completion.requests().is_empty());
}

#[tokio::test]
async fn uploads_are_not_kept_on_disk() {
    let app = spawn_app(MockCaptioner::new("a cat"), MockCompletion::echo()).await;
    let png = png_bytes();

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&png)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let leftover = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = spawn_app_with_limit(MockCaptioner::new("unused"), MockCompletion::echo(), 1024).await;
    let big = vec![0u8; 4096];

    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[image_part(&big)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.captioner.calls().is_empty());
}

#[tokio::test]
async fn cancelled_request_does_not_leave_upload_on_disk() {
    let app = spawn_app(MockCaptioner::hanging(), MockCompletion::echo()).await;
    let png = png_bytes();

    let outcome = tokio::time::timeout(
        std::time::Duration::from_millis(300),
        app.router.clone().oneshot(upload_request(&[image_part(&png)])),
    )
    .await;

    assert!(outcome.is_err(), "request should still be waiting on the captioner");
    assert_eq!(app.captioner.calls(), vec![ModelType::Base]);

    let leftover = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(leftover, 0);
}
