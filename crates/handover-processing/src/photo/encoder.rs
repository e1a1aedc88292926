use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use std::path::Path;

use crate::traits::PhotoEncoder;

/// Photo encoder backed by the `image` crate
pub struct JpegPhotoEncoder;

impl JpegPhotoEncoder {
    /// Decode, shrink to fit and encode. CPU-bound, call from a blocking thread.
    pub fn encode_bytes(data: &[u8], max_dimension: u32, quality: u8) -> Result<Vec<u8>, anyhow::Error> {
        let img = image::load_from_memory(data).context("Failed to decode photo")?;

        let (width, height) = img.dimensions();
        let img = if width > max_dimension || height > max_dimension {
            img.resize(max_dimension, max_dimension, FilterType::Triangle)
        } else {
            img
        };

        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode_image(&rgb)
            .context("Failed to encode JPEG")?;
        Ok(buffer)
    }
}

#[async_trait]
impl PhotoEncoder for JpegPhotoEncoder {
    async fn encode(
        &self,
        source: &Path,
        max_dimension: u32,
        quality: u8,
    ) -> Result<Bytes, anyhow::Error> {
        let data = tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read photo {}", source.display()))?;

        // Image decode is CPU-bound; run off the async pool.
        let encoded = tokio::task::spawn_blocking(move || {
            JpegPhotoEncoder::encode_bytes(&data, max_dimension, quality)
        })
        .await??;

        Ok(Bytes::from(encoded))
    }
}
