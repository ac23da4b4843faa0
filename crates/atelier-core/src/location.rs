//! Location collaborator seam.
//!
//! Real device integrations implement `LocationProvider`; everything
//! downstream only cares about coordinates. Permission denials are an
//! error here - callers substitute the configured default coordinate.

use async_trait::async_trait;
use tracing::warn;

use crate::models::Coordinates;
use crate::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current position, or `Error::PermissionDenied` when the user
    /// has not granted location access
    async fn current_location(&self) -> Result<Coordinates>;
}

/// Provider that always reports a fixed coordinate
///
/// Used both as the test double and as the fallback when no device
/// integration is wired up.
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates> {
        Ok(self.coordinates)
    }
}

/// Resolve the user position, substituting `fallback` when the
/// provider fails (denied permission, no fix, whatever)
pub async fn locate_or_default(
    provider: &dyn LocationProvider,
    fallback: Coordinates,
) -> Coordinates {
    match provider.current_location().await {
        Ok(coords) => coords,
        Err(e) => {
            warn!("Location unavailable ({}), using default coordinate", e);
            fallback
        }
    }
}
