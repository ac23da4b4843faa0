// Core business logic lives here - the brain of the operation
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod favorites;
pub mod geo;
pub mod location;
pub mod models;
pub mod providers;
pub mod recognizer;

pub use catalog::{FilterSpec, SortKey};
pub use config::Config;
pub use error::Error;
pub use favorites::FavoritesStore;
pub use recognizer::Recognizer;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
