// HTTP collaborators: the catalog backend, the vision model, the image host
pub mod catalog;
pub mod media;
pub mod retry;
pub mod vision;

// Re-export common types
pub use catalog::{ArtTool, CatalogClient, CatalogError, FeedbackEntry};
pub use media::{MediaClient, MediaError};
pub use retry::RetryConfig;
pub use vision::{RecognitionOutcome, SimilarMatch, VisionClient, VisionError};
