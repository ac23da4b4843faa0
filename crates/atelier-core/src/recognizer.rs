//! AI-assisted product recognition.
//!
//! Pipeline: host the photo, show the vision model the hosted URL plus
//! a digest of candidate products, get a structured match back. Every
//! stage degrades instead of failing the feature: an upload failure
//! falls back to the local image reference, and a vision failure
//! produces a zero-confidence "Analysis Failed" report.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Product;
use crate::providers::{ImageHost, VisionAnalyzer};
use crate::Result;

/// Structured best-effort match for a photographed product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub features: Vec<String>,
    pub similar_products: Vec<SimilarProduct>,
    pub visual_tags: Vec<String>,
    /// 0.0 (analysis failed) to 1.0 (certain)
    pub confidence: f64,
    /// Raw model text, present only when parsing fell back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// A catalog product the model judged similar to the photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarProduct {
    pub id: String,
    pub similarity: f64,
    pub reason: String,
}

/// What the recognizer actually did, alongside the match itself
#[derive(Debug, Clone)]
pub struct RecognitionReport {
    /// URL handed to the model: hosted when upload worked, the local
    /// path otherwise
    pub image_url: String,
    pub hosted: bool,
    pub result: RecognitionResult,
}

/// Coordinates the image host and the vision model
pub struct Recognizer {
    image_host: Box<dyn ImageHost>,
    vision: Box<dyn VisionAnalyzer>,
}

impl Recognizer {
    pub fn new(image_host: Box<dyn ImageHost>, vision: Box<dyn VisionAnalyzer>) -> Self {
        Self { image_host, vision }
    }

    /// Recognize a local photo against the candidate catalog
    pub async fn recognize(
        &self,
        image_path: &Path,
        candidates: &[Product],
    ) -> Result<RecognitionReport> {
        let (image_url, hosted) = match self.image_host.upload(image_path).await {
            Ok(url) => {
                info!("Image hosted at {}", url);
                (url, true)
            }
            Err(e) => {
                // Non-fatal: the model gets the local reference instead
                warn!("Image upload failed ({}), using local reference", e);
                (image_path.to_string_lossy().to_string(), false)
            }
        };

        let result = match self.vision.analyze(&image_url, candidates).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Vision analysis failed: {}", e);
                failed_result(&e.to_string())
            }
        };

        Ok(RecognitionReport {
            image_url,
            hosted,
            result,
        })
    }
}

/// Zero-confidence report for a hard vision failure
fn failed_result(message: &str) -> RecognitionResult {
    RecognitionResult {
        product_name: "Analysis Failed".to_string(),
        brand: "Unknown".to_string(),
        category: "art-tool".to_string(),
        features: Vec::new(),
        similar_products: Vec::new(),
        visual_tags: Vec::new(),
        confidence: 0.0,
        raw_response: Some(message.to_string()),
    }
}
