use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MediaError>;

/// Client for the image-hosting service (Cloudinary-style unsigned uploads)
///
/// Uploads go to `/v1_1/{cloud_name}/image/upload` as multipart form
/// data with an `upload_preset`; the response carries a hosted HTTPS
/// URL. Callers treat upload failure as non-fatal and fall back to the
/// local image path.
pub struct MediaClient {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl MediaClient {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self::with_base_url(cloud_name, upload_preset, "https://api.cloudinary.com")
    }

    /// For testing against a stub endpoint
    pub fn with_base_url(
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        }
    }

    /// Upload a local image file, returning its hosted URL
    pub async fn upload_image(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo.jpg".to_string());
        let mime = mime_for_filename(&filename);

        debug!("Uploading {} ({} bytes, {})", filename, bytes.len(), mime);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);
        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: UploadErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("Status {}", status));
            return Err(MediaError::UploadFailed(message));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.secure_url)
    }
}

/// Guess an image MIME type from the file extension
fn mime_for_filename(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "heic" => "image/heic",
        // jpg, jpeg, and anything unrecognized
        _ => "image/jpeg",
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize, Default)]
struct UploadErrorBody {
    error: Option<UploadErrorMessage>,
}

#[derive(Deserialize)]
struct UploadErrorMessage {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_for_filename("photo.png"), "image/png");
        assert_eq!(mime_for_filename("photo.PNG"), "image/png");
        assert_eq!(mime_for_filename("photo.webp"), "image/webp");
        assert_eq!(mime_for_filename("photo.jpg"), "image/jpeg");
        assert_eq!(mime_for_filename("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for_filename("photo"), "image/jpeg");
    }

    #[test]
    fn test_upload_response_parses() {
        let body: UploadResponse = serde_json::from_str(
            r#"{"secure_url": "https://res.example.com/image/upload/v1/abc.jpg", "public_id": "abc"}"#,
        )
        .unwrap();
        assert_eq!(
            body.secure_url,
            "https://res.example.com/image/upload/v1/abc.jpg"
        );
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let client = MediaClient::new("demo", "preset");
        let result = client
            .upload_image(Path::new("/definitely/not/here.jpg"))
            .await;
        assert!(matches!(result, Err(MediaError::IoError(_))));
    }
}
