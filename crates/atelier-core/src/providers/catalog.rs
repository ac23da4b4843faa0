// REST catalog provider - bridges the API client with the CatalogProvider trait
use std::time::Duration;

use async_trait::async_trait;
use atelier_api::{ArtTool, CatalogClient, CatalogError, FeedbackEntry};

use super::CatalogProvider;
use crate::models::{Feedback, Product};
use crate::{Error, Result};

/// Wrapper around CatalogClient that implements CatalogProvider
pub struct RestCatalogProvider {
    client: CatalogClient,
}

impl RestCatalogProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: CatalogClient::new(base_url),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: CatalogClient::with_timeout(base_url, Duration::from_secs(timeout_secs)),
        }
    }

    pub fn with_client(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogProvider for RestCatalogProvider {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let tools = self
            .client
            .fetch_art_tools()
            .await
            .map_err(map_catalog_error)?;

        Ok(tools.into_iter().map(tool_to_product).collect())
    }

    async fn get_product(&self, id: &str) -> Result<Product> {
        let tool = self
            .client
            .fetch_art_tool(id)
            .await
            .map_err(map_catalog_error)?;

        Ok(tool_to_product(tool))
    }
}

fn map_catalog_error(e: CatalogError) -> Error {
    match e {
        CatalogError::NotFound(id) => Error::NotFound(id),
        other => Error::ApiError(other.to_string()),
    }
}

/// Convert a wire-format art tool to our internal Product model
fn tool_to_product(tool: ArtTool) -> Product {
    Product {
        id: tool.id,
        art_name: tool.art_name,
        brand: tool.brand,
        price: tool.price,
        limited_time_deal: tool.limited_time_deal,
        category: tool.category,
        feedbacks: tool.feedbacks.into_iter().map(entry_to_feedback).collect(),
        image: tool.image,
        glass_surface: tool.glass_surface,
    }
}

fn entry_to_feedback(entry: FeedbackEntry) -> Feedback {
    Feedback {
        author: entry.author,
        rating: entry.rating,
        comment: entry.comment,
        date: entry.date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_to_product_carries_everything_over() {
        let tool: ArtTool = serde_json::from_str(
            r#"{
                "id": "4",
                "artName": "Watercolor Pan Set",
                "brand": "Sennelier",
                "price": 55.0,
                "limitedTimeDeal": 0.2,
                "category": "paints",
                "glassSurface": true,
                "feedbacks": [
                    {"author": "kay", "rating": 5, "comment": "Rich pigment", "date": "2024-05-02T12:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let product = tool_to_product(tool);
        assert_eq!(product.id, "4");
        assert_eq!(product.art_name, "Watercolor Pan Set");
        assert_eq!(product.limited_time_deal, 0.2);
        assert_eq!(product.glass_surface, Some(true));
        assert_eq!(product.feedbacks.len(), 1);
        assert_eq!(product.feedbacks[0].author, "kay");
    }

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let err = map_catalog_error(CatalogError::NotFound("42".to_string()));
        assert!(matches!(err, Error::NotFound(id) if id == "42"));
    }

    #[test]
    fn test_other_errors_map_to_api_error() {
        let err = map_catalog_error(CatalogError::RequestFailed("Status 500".to_string()));
        assert!(matches!(err, Error::ApiError(_)));
    }
}
