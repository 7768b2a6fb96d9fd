#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use caption_recommender::captioning::mock::MockCaptioner;
use caption_recommender::completion::mock::MockCompletion;
use caption_recommender::recommender::Recommender;
use caption_recommender::startup::{build_router, AppState};
use caption_recommender::storage::UploadStore;
use http_body_util::BodyExt;
use image::{ImageBuffer, ImageOutputFormat, Rgb};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "X-CAPTION-TEST-BOUNDARY";

pub struct TestApp {
    pub router: Router,
    pub captioner: Arc<MockCaptioner>,
    pub completion: Arc<MockCompletion>,
    pub upload_dir: TempDir,
}

pub async fn spawn_app(captioner: MockCaptioner, completion: MockCompletion) -> TestApp {
    spawn_app_with_limit(captioner, completion, 10 * 1024 * 1024).await
}

pub async fn spawn_app_with_limit(
    captioner: MockCaptioner,
    completion: MockCompletion,
    max_upload_bytes: usize,
) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = UploadStore::new(upload_dir.path())
        .await
        .expect("Failed to create upload store");

    let captioner = Arc::new(captioner);
    let completion = Arc::new(completion);
    let recommender = Recommender::new(captioner.clone(), completion.clone());
    let router = build_router(AppState::new(recommender, store), max_upload_bytes);

    TestApp {
        router,
        captioner,
        completion,
        upload_dir,
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(8, 8, Rgb([40, 160, 90]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .expect("Failed to encode test image");
    out
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response was not JSON")
}
