//! Favorited products, persisted as one JSON blob in a slot store.
//!
//! Persistence failures never reach the user: a failed or corrupt read
//! degrades to "no favorites", a failed write is logged and dropped
//! (the set reverts to the pre-write value on the next read).
//!
//! Mutations are get-all / mutate / put-all without locking, so two
//! racing toggles can lose an update. That is acceptable for a
//! single-user local store; UI layers serialize toggles per product.

use atelier_store::SlotStore;
use tracing::{error, warn};

use crate::models::{FavoriteRecord, Product};

const FAVORITES_KEY: &str = "favorites";

/// Persisted set of favorited products, keyed by product id
pub struct FavoritesStore<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> FavoritesStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// All favorites in insertion order; empty on absent or unreadable blob
    pub async fn get_all(&self) -> Vec<FavoriteRecord> {
        let blob = match self.slots.get(FAVORITES_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Error loading favorites: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&blob) {
            Ok(records) => records,
            Err(e) => {
                warn!("Favorites blob was corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Add a product snapshot. Idempotent: a second add of the same id
    /// is a no-op. Returns the updated set.
    pub async fn add(&self, product: Product) -> Vec<FavoriteRecord> {
        let mut favorites = self.get_all().await;

        if favorites.iter().any(|fav| fav.id == product.id) {
            return favorites;
        }

        favorites.push(product);
        self.persist(&favorites).await;
        favorites
    }

    /// Remove by id; a miss is a no-op. An emptied set stays persisted
    /// as an empty blob - only `clear` deletes the slot.
    pub async fn remove(&self, id: &str) -> Vec<FavoriteRecord> {
        let favorites = self.get_all().await;
        let remaining: Vec<FavoriteRecord> =
            favorites.into_iter().filter(|fav| fav.id != id).collect();
        self.persist(&remaining).await;
        remaining
    }

    /// Is this product currently favorited?
    pub async fn contains(&self, id: &str) -> bool {
        self.get_all().await.iter().any(|fav| fav.id == id)
    }

    /// Delete the persisted slot entirely. Idempotent.
    pub async fn clear(&self) {
        if let Err(e) = self.slots.remove(FAVORITES_KEY).await {
            error!("Error clearing favorites: {}", e);
        }
    }

    /// Replace the whole blob in a single write
    async fn persist(&self, favorites: &[FavoriteRecord]) {
        let blob = match serde_json::to_string(favorites) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Error serializing favorites: {}", e);
                return;
            }
        };

        if let Err(e) = self.slots.set(FAVORITES_KEY, &blob).await {
            error!("Error saving favorites: {}", e);
        }
    }
}
