//! Generative-vision collaborator.
//!
//! Talks to a Gemini-style `generateContent` endpoint and turns its
//! free-text answers into structured recognition results. The model is
//! asked for strict JSON but does not always comply, so parsing is
//! best-effort: a malformed answer degrades to a low-confidence
//! placeholder instead of an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Missing API key")]
    MissingApiKey,

    #[error("Empty model response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;

/// Client for the generative-vision model
pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl VisionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// For proxies or testing with a stub endpoint
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Analyze a product photo against a candidate list.
    ///
    /// Always produces a `RecognitionOutcome`: a clean parse when the
    /// model behaves, otherwise the low-confidence fallback carrying
    /// the raw text for debugging.
    pub async fn analyze_product_image(
        &self,
        image_url: &str,
        candidates: &[CandidateProduct],
    ) -> Result<RecognitionOutcome> {
        let prompt = build_recognition_prompt(image_url, candidates);
        let text = self.generate(&prompt).await?;

        debug!("Vision model answered {} chars", text.len());
        Ok(parse_recognition(&text))
    }

    /// Prose suggestions based on what the user has favorited
    pub async fn suggest_from_favorites(&self, favorites: &[CandidateProduct]) -> Result<String> {
        if favorites.is_empty() {
            return Ok("Add some favorites first to get suggestions!".to_string());
        }

        let prompt = build_suggestion_prompt(favorites);
        self.generate(&prompt).await
    }

    /// One round-trip to the generateContent endpoint
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(VisionError::MissingApiKey);
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(VisionError::EmptyResponse)
    }
}

/// Compact product digest embedded into prompts
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProduct {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
}

/// Structured recognition result from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOutcome {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub similar_products: Vec<SimilarMatch>,
    #[serde(default)]
    pub visual_tags: Vec<String>,
    pub confidence: f64,
    /// Raw model text, kept only when parsing fell back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarMatch {
    pub id: String,
    pub similarity: f64,
    pub reason: String,
}

fn build_recognition_prompt(image_url: &str, candidates: &[CandidateProduct]) -> String {
    let digest = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an AI expert in art supplies and tools. Analyze this image: {image_url}

Available products in our database:
{digest}

Based on the image, find the 3 most similar products from our database. Consider:
- Visual appearance (colors, shape, materials)
- Product type and category
- Brand similarity
- Function and use case

Return ONLY a JSON object in this exact format:
{{
  "productName": "Detected product name",
  "brand": "Detected brand",
  "category": "Product category",
  "features": ["feature1", "feature2"],
  "similarProducts": [
    {{"id": "1", "similarity": 0.9, "reason": "similar colors and materials"}}
  ],
  "visualTags": ["paint", "brush", "colorful"],
  "confidence": 0.85
}}

IMPORTANT: Only return JSON, no other text."#
    )
}

fn build_suggestion_prompt(favorites: &[CandidateProduct]) -> String {
    let digest = serde_json::to_string_pretty(favorites).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Based on these art tools that a user has favorited:
{digest}

Please analyze their preferences and suggest 2 new art tools they might like.
For each suggestion:
1. Product name
2. Category/Type
3. Estimated price range
4. Key features
5. Why it matches their taste

Keep each suggestion concise and practical."#
    )
}

/// Parse model output into a `RecognitionOutcome`, falling back to a
/// half-confidence placeholder when the JSON is mangled.
pub fn parse_recognition(text: &str) -> RecognitionOutcome {
    let cleaned = strip_code_fences(text);

    match serde_json::from_str::<RecognitionOutcome>(cleaned) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Vision response was not valid JSON ({}), using fallback", e);
            fallback_outcome(text)
        }
    }
}

/// Placeholder result for answers the model mangled
fn fallback_outcome(raw: &str) -> RecognitionOutcome {
    RecognitionOutcome {
        product_name: "Unknown Product".to_string(),
        brand: "Unknown Brand".to_string(),
        category: "art-tool".to_string(),
        features: vec!["art supply".to_string()],
        similar_products: Vec::new(),
        visual_tags: vec!["art".to_string(), "creative".to_string()],
        confidence: 0.5,
        raw_response: Some(raw.to_string()),
    }
}

/// Models love wrapping JSON in ```json fences despite instructions
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}
