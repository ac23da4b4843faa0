use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry, RetryConfig};

/// How long we wait for the catalog backend before giving up
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Server unavailable: {0}")]
    ServerBusy(String),

    #[error("Art tool not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether retrying the request could change the answer.
    ///
    /// Overloaded servers and transport blips are transient; a 404 or
    /// a rejected request stays a 404 no matter how often we ask.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::ServerBusy(_) | CatalogError::NetworkError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Client for the art-tools catalog REST API
///
/// The backend is a plain unauthenticated JSON API:
/// `GET /art-tools` for the whole catalog, `GET /art-tools/{id}` for
/// one product including its feedback thread.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Same client with a non-default request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Atelier/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_config: RetryConfig::default(),
        }
    }

    /// Create client with custom retry configuration
    pub fn with_retry_config(base_url: impl Into<String>, retry_config: RetryConfig) -> Self {
        let mut client = Self::new(base_url);
        client.retry_config = retry_config;
        client
    }

    /// Fetch the full catalog
    pub async fn fetch_art_tools(&self) -> Result<Vec<ArtTool>> {
        let url = format!("{}/art-tools", self.base_url);

        with_retry(
            &self.retry_config,
            || async {
                let response = self.client.get(&url).send().await?;

                if !response.status().is_success() {
                    return Err(status_error(response).await);
                }

                let tools: Vec<ArtTool> = response.json().await?;
                Ok(tools)
            },
            CatalogError::is_retryable,
        )
        .await
    }

    /// Fetch a single art tool, feedbacks included
    pub async fn fetch_art_tool(&self, id: &str) -> Result<ArtTool> {
        let url = format!("{}/art-tools/{}", self.base_url, id);

        with_retry(
            &self.retry_config,
            || async {
                let response = self.client.get(&url).send().await?;

                if response.status() == 404 {
                    return Err(CatalogError::NotFound(id.to_string()));
                }

                if !response.status().is_success() {
                    return Err(status_error(response).await);
                }

                let tool: ArtTool = response.json().await?;
                Ok(tool)
            },
            CatalogError::is_retryable,
        )
        .await
    }

    /// How many feedbacks a tool has collected
    pub async fn count_feedbacks(&self, id: &str) -> Result<usize> {
        let tool = self.fetch_art_tool(id).await?;
        Ok(tool.feedbacks.len())
    }

    /// Mean feedback rating for a tool, 0.0 when nobody has reviewed it
    pub async fn average_rating(&self, id: &str) -> Result<f64> {
        let tool = self.fetch_art_tool(id).await?;
        Ok(tool.average_rating())
    }
}

/// Turn a non-2xx response into the matching error variant
async fn status_error(response: reqwest::Response) -> CatalogError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = format!("Status {}: {}", status, body);

    if is_retryable_status(status) {
        CatalogError::ServerBusy(message)
    } else {
        CatalogError::RequestFailed(message)
    }
}

/// Wire representation of a catalog product.
///
/// The backend speaks camelCase; serde does the renaming so the rest
/// of the workspace never sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtTool {
    pub id: String,
    pub art_name: String,
    pub brand: String,
    pub price: f64,
    /// Fractional discount in 0..=1; 0 means no active deal
    #[serde(default)]
    pub limited_time_deal: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackEntry>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub glass_surface: Option<bool>,
}

impl ArtTool {
    /// Mean rating across feedbacks, 0.0 for an empty thread
    pub fn average_rating(&self) -> f64 {
        if self.feedbacks.is_empty() {
            return 0.0;
        }
        let total: f64 = self.feedbacks.iter().map(|f| f.rating).sum();
        total / self.feedbacks.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub author: String,
    /// Star rating in 1..=5
    pub rating: f64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool_json() -> &'static str {
        r#"{
            "id": "7",
            "artName": "Kolinsky Sable Round Brush",
            "brand": "Winsor & Newton",
            "price": 24.5,
            "limitedTimeDeal": 0.15,
            "category": "brushes",
            "image": "https://example.com/brush.jpg",
            "glassSurface": false,
            "feedbacks": [
                {"author": "mia", "rating": 5, "comment": "Lovely point", "date": "2024-03-01T10:00:00Z"},
                {"author": "jo", "rating": 4, "comment": "A bit pricey", "date": "2024-04-12T08:30:00Z"}
            ]
        }"#
    }

    #[test]
    fn test_art_tool_deserializes_camel_case() {
        let tool: ArtTool = serde_json::from_str(sample_tool_json()).unwrap();

        assert_eq!(tool.id, "7");
        assert_eq!(tool.art_name, "Kolinsky Sable Round Brush");
        assert_eq!(tool.brand, "Winsor & Newton");
        assert_eq!(tool.limited_time_deal, 0.15);
        assert_eq!(tool.glass_surface, Some(false));
        assert_eq!(tool.feedbacks.len(), 2);
        assert_eq!(tool.feedbacks[0].author, "mia");
    }

    #[test]
    fn test_art_tool_optional_fields_default() {
        let tool: ArtTool = serde_json::from_str(
            r#"{"id": "1", "artName": "Charcoal Stick", "brand": "Derwent", "price": 3.0}"#,
        )
        .unwrap();

        assert_eq!(tool.limited_time_deal, 0.0);
        assert!(tool.category.is_none());
        assert!(tool.feedbacks.is_empty());
        assert!(tool.image.is_none());
        assert!(tool.glass_surface.is_none());
    }

    #[test]
    fn test_average_rating() {
        let tool: ArtTool = serde_json::from_str(sample_tool_json()).unwrap();
        assert!((tool.average_rating() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rating_empty_is_zero() {
        let tool: ArtTool = serde_json::from_str(
            r#"{"id": "1", "artName": "Charcoal Stick", "brand": "Derwent", "price": 3.0}"#,
        )
        .unwrap();
        assert_eq!(tool.average_rating(), 0.0);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("https://api.example.com/v1/");
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_error_retryability_classification() {
        assert!(CatalogError::ServerBusy("Status 503: down".to_string()).is_retryable());

        assert!(!CatalogError::NotFound("42".to_string()).is_retryable());
        assert!(!CatalogError::RequestFailed("Status 400: bad".to_string()).is_retryable());
        let parse: CatalogError = serde_json::from_str::<ArtTool>("{").unwrap_err().into();
        assert!(!parse.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_tool_does_not_consume_retries() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let call_count = AtomicU32::new(0);

        let result = with_retry(
            &RetryConfig::default(),
            || async {
                call_count.fetch_add(1, Ordering::SeqCst);
                Err::<ArtTool, _>(CatalogError::NotFound("42".to_string()))
            },
            CatalogError::is_retryable,
        )
        .await;

        assert!(matches!(result, Err(CatalogError::NotFound(id)) if id == "42"));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
