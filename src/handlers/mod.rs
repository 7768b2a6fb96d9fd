pub mod health;
pub mod index;
pub mod upload;

pub use health::health_check;
pub use index::index;
pub use upload::upload_image;
