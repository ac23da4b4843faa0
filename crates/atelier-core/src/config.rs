use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from a TOML file in the user config dir; every section has
/// workable defaults so a missing file just means "the demo setup".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub vision: VisionConfig,
    pub media: MediaConfig,
    pub location: LocationConfig,
    pub stores: StoresConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// if the file doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path (XDG on Linux/macOS, AppData on Windows)
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("atelier");

        Ok(config_dir.join("config.toml"))
    }

    /// Where the slot store keeps its files
    pub fn data_dir() -> crate::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("atelier");

        Ok(data_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the art-tools catalog API
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://api.artsupply.example/v1".to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// API key for the generative-vision service
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_vision_model")]
    pub model: String,
}

fn default_vision_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_vision_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MediaConfig {
    /// Image-host account ("cloud name")
    pub cloud_name: Option<String>,

    /// Unsigned upload preset
    pub upload_preset: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fallback coordinate when device location is unavailable -
    /// defaults to the flagship store
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
}

fn default_latitude() -> f64 {
    10.8444
}

fn default_longitude() -> f64 {
    106.7639
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoresConfig {
    /// Default search radius for nearby stores, in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    10.0
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stores.radius_km, 10.0);
        assert_eq!(config.vision.model, "gemini-2.5-flash");
        assert_eq!(config.location.default_latitude, 10.8444);
        assert!(config.vision.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("base_url"));
        assert!(toml.contains("radius_km"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            base_url = "https://staging.example/api"

            [vision]
            api_key = "k-123"
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.base_url, "https://staging.example/api");
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.vision.api_key.as_deref(), Some("k-123"));
        // Untouched sections keep their defaults
        assert_eq!(config.vision.model, "gemini-2.5-flash");
        assert_eq!(config.stores.radius_km, 10.0);
    }
}
