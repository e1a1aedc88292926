//! Seams to the capabilities the pipeline depends on

use async_trait::async_trait;
use bytes::Bytes;
use handover_core::HandoverError;
use std::path::{Path, PathBuf};

/// Re-encodes one photo as JPEG
#[async_trait]
pub trait PhotoEncoder: Send + Sync {
    /// Fit the image into `max_dimension` x `max_dimension` (never upscaling)
    /// and encode it at `quality`.
    async fn encode(
        &self,
        source: &Path,
        max_dimension: u32,
        quality: u8,
    ) -> Result<Bytes, anyhow::Error>;
}

/// Turns a finished HTML document into the file that gets shared
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render `html` to `<output dir>/<file_stem>.<ext>` and return the path.
    async fn render(&self, html: &str, file_stem: &str) -> Result<PathBuf, HandoverError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
