// Vision provider - bridges the vision client with the VisionAnalyzer trait
use async_trait::async_trait;
use atelier_api::vision::CandidateProduct;
use atelier_api::{RecognitionOutcome, SimilarMatch, VisionClient};

use super::VisionAnalyzer;
use crate::models::Product;
use crate::recognizer::{RecognitionResult, SimilarProduct};
use crate::{Error, Result};

/// Wrapper around VisionClient that implements VisionAnalyzer
pub struct GenerativeVision {
    client: VisionClient,
}

impl GenerativeVision {
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Self {
        let mut client = VisionClient::new(api_key);
        if let Some(model) = model {
            client = client.with_model(model);
        }
        Self { client }
    }

    pub fn with_client(client: VisionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionAnalyzer for GenerativeVision {
    async fn analyze(&self, image_url: &str, candidates: &[Product]) -> Result<RecognitionResult> {
        let digest: Vec<CandidateProduct> = candidates.iter().map(product_to_candidate).collect();

        let outcome = self
            .client
            .analyze_product_image(image_url, &digest)
            .await
            .map_err(|e| Error::RecognitionError(e.to_string()))?;

        Ok(outcome_to_result(outcome))
    }

    async fn suggest(&self, favorites: &[Product]) -> Result<String> {
        let digest: Vec<CandidateProduct> = favorites.iter().map(product_to_candidate).collect();

        self.client
            .suggest_from_favorites(&digest)
            .await
            .map_err(|e| Error::RecognitionError(e.to_string()))
    }
}

/// Compact prompt digest of a product
fn product_to_candidate(product: &Product) -> CandidateProduct {
    CandidateProduct {
        id: product.id.clone(),
        name: product.art_name.clone(),
        brand: product.brand.clone(),
        category: product
            .category
            .clone()
            .unwrap_or_else(|| "art-tool".to_string()),
        price: product.price,
    }
}

/// Convert the wire-format outcome to our internal result model
fn outcome_to_result(outcome: RecognitionOutcome) -> RecognitionResult {
    RecognitionResult {
        product_name: outcome.product_name,
        brand: outcome.brand,
        category: outcome.category,
        features: outcome.features,
        similar_products: outcome
            .similar_products
            .into_iter()
            .map(match_to_similar)
            .collect(),
        visual_tags: outcome.visual_tags,
        confidence: outcome.confidence,
        raw_response: outcome.raw_response,
    }
}

fn match_to_similar(m: SimilarMatch) -> SimilarProduct {
    SimilarProduct {
        id: m.id,
        similarity: m.similarity,
        reason: m.reason,
    }
}
