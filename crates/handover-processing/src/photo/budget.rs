//! Photo-budget compressor
//!
//! All photos are re-encoded together at one (dimension, quality) setting.
//! While the aggregate size is over budget the setting walks down the quality
//! ladder, then the dimension ladder. When both are exhausted, photos are
//! dropped in the configured removal order until the budget is met.

use base64::{engine::general_purpose, Engine as _};
use handover_core::{HandoverError, PhotoBudgetConfig, PhotoSet, PhotoSlot, PhotoSource};
use serde::Serialize;
use std::sync::Arc;

use crate::traits::PhotoEncoder;

/// One photo ready for embedding. An empty payload means "omit this photo".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPhoto {
    pub slot: PhotoSlot,
    pub base64: String,
}

impl EncodedPhoto {
    pub fn is_omitted(&self) -> bool {
        self.base64.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    pub dimension: u32,
    pub quality: u8,
    /// Number of full re-encoding passes
    pub passes: usize,
    pub removed: Vec<PhotoSlot>,
    pub total_bytes: u64,
    pub budget_bytes: u64,
    pub within_budget: bool,
}

#[derive(Debug, Clone)]
pub struct CompressedPhotos {
    /// Document order, omitted photos included with an empty payload
    pub photos: Vec<EncodedPhoto>,
    pub report: BudgetReport,
}

/// Decoded size of a base64 payload; a `data:...;base64,` prefix is ignored.
pub fn estimate_base64_bytes(data: &str) -> u64 {
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest
            .rfind(";base64,")
            .map(|idx| &rest[idx + ";base64,".len()..])
            .unwrap_or(data),
        None => data,
    };
    (payload.len() as u64 * 3).div_ceil(4)
}

pub struct PhotoBudgetCompressor {
    encoder: Arc<dyn PhotoEncoder>,
    config: PhotoBudgetConfig,
}

impl PhotoBudgetCompressor {
    pub fn new(encoder: Arc<dyn PhotoEncoder>, config: PhotoBudgetConfig) -> Self {
        Self { encoder, config }
    }

    pub fn config(&self) -> &PhotoBudgetConfig {
        &self.config
    }

    /// Encode one photo, falling back to the original bytes, then to nothing.
    async fn encode_one(&self, slot: PhotoSlot, source: &PhotoSource, dimension: u32, quality: u8) -> String {
        match self.encoder.encode(source.path(), dimension, quality).await {
            Ok(bytes) => general_purpose::STANDARD.encode(&bytes),
            Err(err) => {
                tracing::warn!(
                    slot = %slot,
                    dimension = dimension,
                    quality = quality,
                    error = %err,
                    "Photo re-encoding failed, embedding original file"
                );
                match tokio::fs::read(source.path()).await {
                    Ok(raw) => general_purpose::STANDARD.encode(raw),
                    Err(read_err) => {
                        tracing::warn!(
                            slot = %slot,
                            path = %source.path().display(),
                            error = %read_err,
                            "Original photo unreadable, photo will be omitted"
                        );
                        String::new()
                    }
                }
            }
        }
    }

    // Sequential on purpose: each pass is measured as a whole.
    async fn encode_all(&self, photos: &PhotoSet, dimension: u32, quality: u8) -> Vec<EncodedPhoto> {
        let mut encoded = Vec::with_capacity(PhotoSlot::ALL.len());
        for (slot, source) in photos.iter() {
            let base64 = self.encode_one(slot, source, dimension, quality).await;
            encoded.push(EncodedPhoto { slot, base64 });
        }
        encoded
    }

    fn total_bytes(photos: &[EncodedPhoto], extra_bytes: u64) -> u64 {
        extra_bytes
            + photos
                .iter()
                .map(|p| estimate_base64_bytes(&p.base64))
                .sum::<u64>()
    }

    /// Fit the populated photos of `photos` into the budget.
    ///
    /// `extra_bytes` is the size of everything else embedded next to the
    /// photos (QR code, logos).
    pub async fn compress(
        &self,
        photos: &PhotoSet,
        extra_bytes: u64,
    ) -> Result<CompressedPhotos, HandoverError> {
        let dimensions = &self.config.dimensions;
        let qualities = &self.config.qualities;
        let budget = self.config.budget_bytes;

        let (Some(&first_dimension), Some(&first_quality)) = (dimensions.first(), qualities.first())
        else {
            return Err(HandoverError::Config(
                "Photo dimension and quality ladders must not be empty".to_string(),
            ));
        };

        let (mut dim_idx, mut quality_idx) = (0usize, 0usize);
        let mut encoded = self.encode_all(photos, first_dimension, first_quality).await;
        let mut passes = 1;
        let mut total = Self::total_bytes(&encoded, extra_bytes);

        tracing::debug!(
            dimension = first_dimension,
            quality = first_quality,
            total_bytes = total,
            budget_bytes = budget,
            "Initial photo pass"
        );

        while total > budget {
            if quality_idx + 1 < qualities.len() {
                quality_idx += 1;
            } else if dim_idx + 1 < dimensions.len() {
                dim_idx += 1;
                quality_idx = 0;
            } else {
                break;
            }

            let (dimension, quality) = (dimensions[dim_idx], qualities[quality_idx]);
            encoded = self.encode_all(photos, dimension, quality).await;
            passes += 1;
            total = Self::total_bytes(&encoded, extra_bytes);

            tracing::debug!(
                dimension = dimension,
                quality = quality,
                total_bytes = total,
                budget_bytes = budget,
                "Photos re-encoded"
            );
        }

        let mut removed = Vec::new();
        for slot in &self.config.removal_order {
            if total <= budget {
                break;
            }
            if let Some(photo) = encoded
                .iter_mut()
                .find(|p| p.slot == *slot && !p.is_omitted())
            {
                photo.base64.clear();
                removed.push(*slot);
                total = Self::total_bytes(&encoded, extra_bytes);
                tracing::info!(
                    slot = %slot,
                    total_bytes = total,
                    budget_bytes = budget,
                    "Photo dropped to meet size budget"
                );
            }
        }

        let within_budget = total <= budget;
        if !within_budget {
            tracing::warn!(
                total_bytes = total,
                budget_bytes = budget,
                "Photos still exceed budget, keeping remaining photos"
            );
        }

        Ok(CompressedPhotos {
            photos: encoded,
            report: BudgetReport {
                dimension: dimensions[dim_idx],
                quality: qualities[quality_idx],
                passes,
                removed,
                total_bytes: total,
                budget_bytes: budget,
                within_budget,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::Path;
    use std::sync::Mutex;

    /// Produces `dimension * quality * 3` bytes, so the estimate is exact.
    struct SizedEncoder {
        calls: Mutex<Vec<(u32, u8)>>,
    }

    impl SizedEncoder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PhotoEncoder for SizedEncoder {
        async fn encode(&self, _source: &Path, max_dimension: u32, quality: u8) -> Result<Bytes, anyhow::Error> {
            self.calls.lock().unwrap().push((max_dimension, quality));
            Ok(Bytes::from(vec![0u8; max_dimension as usize * quality as usize * 3]))
        }
    }

    struct FailingEncoder;

    #[async_trait]
    impl PhotoEncoder for FailingEncoder {
        async fn encode(&self, _source: &Path, _max_dimension: u32, _quality: u8) -> Result<Bytes, anyhow::Error> {
            Err(anyhow!("unsupported format"))
        }
    }

    fn full_set() -> PhotoSet {
        let mut set = PhotoSet::new();
        for slot in PhotoSlot::ALL {
            set.set(slot, PhotoSource::new(format!("/photos/{}.jpg", slot)));
        }
        set
    }

    fn config(budget_bytes: u64) -> PhotoBudgetConfig {
        PhotoBudgetConfig {
            budget_bytes,
            ..PhotoBudgetConfig::default()
        }
    }

    #[test]
    fn test_estimate_base64_bytes() {
        assert_eq!(estimate_base64_bytes(""), 0);
        assert_eq!(estimate_base64_bytes("AAAA"), 3);
        assert_eq!(estimate_base64_bytes("AAAAA"), 4);
        assert_eq!(estimate_base64_bytes("data:image/png;base64,AAAA"), 3);
        assert_eq!(estimate_base64_bytes("data:image/jpeg;base64,AAAAAAAA"), 6);
    }

    #[tokio::test]
    async fn test_fits_on_first_pass() {
        let encoder = SizedEncoder::new();
        let compressor = PhotoBudgetCompressor::new(encoder.clone(), config(10_000_000));

        let result = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!(result.photos.len(), 5);
        assert_eq!(result.report.passes, 1);
        assert_eq!((result.report.dimension, result.report.quality), (800, 60));
        assert_eq!(result.report.total_bytes, 5 * 144_000);
        assert!(result.report.within_budget);
        assert_eq!(encoder.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_steps_down_quality_first() {
        // (800,60)=720k, (800,50)=600k, (800,40)=480k
        let compressor = PhotoBudgetCompressor::new(SizedEncoder::new(), config(500_000));

        let result = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!((result.report.dimension, result.report.quality), (800, 40));
        assert_eq!(result.report.passes, 3);
        assert_eq!(result.report.total_bytes, 480_000);
        assert!(result.report.removed.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_step_resets_quality() {
        // (800,30)=360k is over, (600,60)=540k is over, (600,50)=450k, (600,40)=360k, (600,30)=270k fits
        let encoder = SizedEncoder::new();
        let compressor = PhotoBudgetCompressor::new(encoder.clone(), config(300_000));

        let result = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!((result.report.dimension, result.report.quality), (600, 30));
        assert_eq!(result.report.passes, 8);

        let calls = encoder.calls.lock().unwrap();
        assert_eq!(calls[20], (600, 60));
    }

    #[tokio::test]
    async fn test_removes_in_order_until_budget_met() {
        // (400,30) = 36k per photo, 180k total
        let compressor = PhotoBudgetCompressor::new(SizedEncoder::new(), config(150_000));

        let result = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!(result.report.passes, 12);
        assert_eq!(result.report.removed, vec![PhotoSlot::TitleBack]);
        assert_eq!(result.report.total_bytes, 144_000);
        assert!(result.report.within_budget);

        let back = result
            .photos
            .iter()
            .find(|p| p.slot == PhotoSlot::TitleBack)
            .unwrap();
        assert!(back.is_omitted());
    }

    #[tokio::test]
    async fn test_gives_up_after_removal_list() {
        let compressor = PhotoBudgetCompressor::new(SizedEncoder::new(), config(1_000));

        let result = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!(
            result.report.removed,
            vec![PhotoSlot::TitleBack, PhotoSlot::Interior]
        );
        assert_eq!(result.report.total_bytes, 3 * 36_000);
        assert!(!result.report.within_budget);
        assert_eq!(result.photos.iter().filter(|p| !p.is_omitted()).count(), 3);
    }

    #[tokio::test]
    async fn test_extra_bytes_count_against_budget() {
        let compressor = PhotoBudgetCompressor::new(SizedEncoder::new(), config(730_000));

        let without = compressor.compress(&full_set(), 0).await.unwrap();
        assert_eq!(without.report.passes, 1);

        let with = compressor.compress(&full_set(), 20_000).await.unwrap();
        assert_eq!(with.report.passes, 2);
        assert_eq!(with.report.total_bytes, 620_000);
    }

    #[tokio::test]
    async fn test_encoder_failure_falls_back_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.heic");
        std::fs::write(&path, b"raw photo bytes").unwrap();

        let mut set = PhotoSet::new();
        set.set(PhotoSlot::Front, PhotoSource::new(&path));
        set.set(PhotoSlot::Vin, PhotoSource::new(dir.path().join("missing.jpg")));

        let compressor = PhotoBudgetCompressor::new(Arc::new(FailingEncoder), config(10_000_000));
        let result = compressor.compress(&set, 0).await.unwrap();

        assert_eq!(result.photos.len(), 2);
        assert_eq!(
            result.photos[0].base64,
            general_purpose::STANDARD.encode(b"raw photo bytes")
        );
        assert!(result.photos[1].is_omitted());
    }

    #[tokio::test]
    async fn test_empty_ladder_is_config_error() {
        let cfg = PhotoBudgetConfig {
            qualities: vec![],
            ..PhotoBudgetConfig::default()
        };
        let compressor = PhotoBudgetCompressor::new(SizedEncoder::new(), cfg);
        let err = compressor.compress(&full_set(), 0).await.unwrap_err();
        assert!(matches!(err, HandoverError::Config(_)));
    }
}
