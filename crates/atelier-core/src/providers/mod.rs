// Provider traits - the seams between core logic and the outside world
//
// Screens and the recognizer talk to these traits, never to concrete
// HTTP clients. That keeps the logic testable with in-memory fakes.
pub mod catalog;
pub mod media;
pub mod vision;

use std::path::Path;

use async_trait::async_trait;

use crate::models::Product;
use crate::recognizer::RecognitionResult;
use crate::Result;

pub use catalog::RestCatalogProvider;
pub use media::HostedImageUploader;
pub use vision::GenerativeVision;

/// Source of catalog products
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The whole catalog
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// One product, feedbacks included
    async fn get_product(&self, id: &str) -> Result<Product>;
}

/// Something that turns a local image file into a hosted URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String>;
}

/// The generative-vision collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Match an image against candidate products. Implementations
    /// degrade malformed model output to a low-confidence result
    /// instead of failing.
    async fn analyze(&self, image_url: &str, candidates: &[Product]) -> Result<RecognitionResult>;

    /// Prose shopping suggestions from the user's favorites
    async fn suggest(&self, favorites: &[Product]) -> Result<String>;
}
