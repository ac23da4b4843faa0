use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog product - the star of the show
///
/// Serialized in camelCase so the same shape works for the catalog
/// API wire format and the persisted favorites blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub art_name: String,
    pub brand: String,
    /// Listed price, always >= 0
    pub price: f64,
    /// Fractional discount in 0..=1; 0 means no active deal
    #[serde(default)]
    pub limited_time_deal: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub glass_surface: Option<bool>,
}

impl Product {
    pub fn is_on_sale(&self) -> bool {
        self.limited_time_deal > 0.0
    }

    /// Listed price with the limited-time deal applied
    pub fn discounted_price(&self) -> f64 {
        self.price * (1.0 - self.limited_time_deal)
    }

    pub fn review_count(&self) -> usize {
        self.feedbacks.len()
    }

    /// Mean feedback rating, 0.0 when nobody has reviewed it
    pub fn average_rating(&self) -> f64 {
        if self.feedbacks.is_empty() {
            return 0.0;
        }
        let total: f64 = self.feedbacks.iter().map(|f| f.rating).sum();
        total / self.feedbacks.len() as f64
    }
}

/// A single customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub author: String,
    /// Star rating in 1..=5
    pub rating: f64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// A favorited product is persisted as a full snapshot of the product
/// at the time of favoriting, keyed by `id`. Insertion order is what
/// list screens display.
pub type FavoriteRecord = Product;

/// Physical store carrying catalog products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub location: Option<StoreLocation>,
    #[serde(default)]
    pub rating: f64,
    /// Ids of products stocked at this store
    #[serde(default)]
    pub products: Vec<String>,
    /// Kilometers from the reference point; None until annotated or
    /// when the store has no usable location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoreLocation {
    pub lat: f64,
    pub lng: f64,
}

/// A point on Earth, as the location collaborator reports it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
