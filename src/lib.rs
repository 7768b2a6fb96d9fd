//! Image caption and music recommendation service.
//!
//! An uploaded photo is described by an image-captioning model, and that
//! description is handed to a chat-completion model which writes social
//! captions and suggests songs to go with it.

pub mod captioning;
pub mod completion;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod recommender;
pub mod startup;
pub mod storage;
pub mod telemetry;

pub use error::AppError;
pub use startup::{AppState, Application};
