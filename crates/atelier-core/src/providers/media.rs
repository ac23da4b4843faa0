// Image-host provider - bridges the media client with the ImageHost trait
use std::path::Path;

use async_trait::async_trait;
use atelier_api::MediaClient;

use super::ImageHost;
use crate::{Error, Result};

/// Wrapper around MediaClient that implements ImageHost
pub struct HostedImageUploader {
    client: MediaClient,
}

impl HostedImageUploader {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: MediaClient::new(cloud_name, upload_preset),
        }
    }

    pub fn with_client(client: MediaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageHost for HostedImageUploader {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.client
            .upload_image(path)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))
    }
}
