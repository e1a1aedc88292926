//! Logo and other embedded image assets
//!
//! Assets are resolved into `data:` URLs so the documents are self-contained.

use base64::{engine::general_purpose, Engine as _};
use handover_core::{AssetSource, HandoverError};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::Mutex;

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

fn mime_for_bytes(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        _ => "image/png",
    }
}

fn data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(data))
}

/// Resolve an asset into a `data:` URL.
pub async fn resolve_asset(
    source: &AssetSource,
    client: &reqwest::Client,
) -> Result<String, HandoverError> {
    match source {
        AssetSource::Inline(url) => Ok(url.clone()),
        AssetSource::Bundled(bytes) => Ok(data_url(mime_for_bytes(bytes), bytes)),
        AssetSource::File(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                HandoverError::Asset(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok(data_url(mime_for_extension(path), &data))
        }
        AssetSource::Remote(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| HandoverError::Asset(format!("Failed to fetch {}: {}", url, e)))?;

            let mime = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

            let data = response
                .bytes()
                .await
                .map_err(|e| HandoverError::Asset(format!("Failed to read {}: {}", url, e)))?;

            let mime = mime
                .filter(|m| m.starts_with("image/"))
                .unwrap_or_else(|| mime_for_bytes(&data).to_string());
            Ok(data_url(&mime, &data))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogoSlot {
    TopRight,
    BottomLeft,
}

/// Memoized logo data URLs
///
/// A logo that is not configured or cannot be resolved is an empty string and
/// the documents leave it out.
pub struct LogoCache {
    top_right: Option<AssetSource>,
    bottom_left: Option<AssetSource>,
    client: reqwest::Client,
    resolved: Mutex<HashMap<LogoSlot, String>>,
}

impl LogoCache {
    pub fn new(top_right: Option<AssetSource>, bottom_left: Option<AssetSource>) -> Self {
        Self {
            top_right,
            bottom_left,
            client: reqwest::Client::new(),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    fn source(&self, slot: LogoSlot) -> Option<&AssetSource> {
        match slot {
            LogoSlot::TopRight => self.top_right.as_ref(),
            LogoSlot::BottomLeft => self.bottom_left.as_ref(),
        }
    }

    pub async fn get(&self, slot: LogoSlot) -> String {
        let mut resolved = self.resolved.lock().await;
        if let Some(url) = resolved.get(&slot) {
            return url.clone();
        }

        let url = match self.source(slot) {
            None => String::new(),
            Some(source) => match resolve_asset(source, &self.client).await {
                Ok(url) => {
                    tracing::debug!(slot = ?slot, source = %source.describe(), "Logo resolved");
                    url
                }
                Err(err) => {
                    tracing::warn!(
                        slot = ?slot,
                        source = %source.describe(),
                        error = %err,
                        "Logo unavailable, leaving it out"
                    );
                    String::new()
                }
            },
        };

        resolved.insert(slot, url.clone());
        url
    }

    /// Drop memoized logos; the next `get` resolves again.
    pub async fn invalidate(&self) {
        self.resolved.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[tokio::test]
    async fn test_inline_passthrough() {
        let client = reqwest::Client::new();
        let source = AssetSource::Inline("data:image/png;base64,AAAA".to_string());
        assert_eq!(
            resolve_asset(&source, &client).await.unwrap(),
            "data:image/png;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_bundled_and_file() {
        let client = reqwest::Client::new();

        let bundled = resolve_asset(&AssetSource::Bundled(PNG_MAGIC), &client)
            .await
            .unwrap();
        assert!(bundled.starts_with("data:image/png;base64,"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.jpg");
        std::fs::write(&path, b"jpeg-ish").unwrap();
        let file = resolve_asset(&AssetSource::File(path), &client).await.unwrap();
        assert_eq!(
            file,
            format!(
                "data:image/jpeg;base64,{}",
                general_purpose::STANDARD.encode(b"jpeg-ish")
            )
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_asset_error() {
        let client = reqwest::Client::new();
        let err = resolve_asset(
            &AssetSource::File("/no/such/logo.png".into()),
            &client,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HandoverError::Asset(_)));
    }

    #[tokio::test]
    async fn test_cache_memoizes_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.png");
        std::fs::write(&path, b"first").unwrap();

        let cache = LogoCache::new(Some(AssetSource::File(path.clone())), None);
        let first = cache.get(LogoSlot::TopRight).await;
        assert!(first.ends_with(&general_purpose::STANDARD.encode(b"first")));

        std::fs::write(&path, b"second").unwrap();
        assert_eq!(cache.get(LogoSlot::TopRight).await, first);

        cache.invalidate().await;
        let reloaded = cache.get(LogoSlot::TopRight).await;
        assert!(reloaded.ends_with(&general_purpose::STANDARD.encode(b"second")));
    }

    #[tokio::test]
    async fn test_unconfigured_or_broken_logo_is_empty() {
        let cache = LogoCache::new(
            None,
            Some(AssetSource::File("/no/such/bottom.png".into())),
        );
        assert_eq!(cache.get(LogoSlot::TopRight).await, "");
        assert_eq!(cache.get(LogoSlot::BottomLeft).await, "");
    }
}
