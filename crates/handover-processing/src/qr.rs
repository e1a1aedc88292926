//! Payment QR code rendering

use base64::{engine::general_purpose, Engine as _};
use handover_core::HandoverError;
use image::{ImageFormat, Luma};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Renders SPD payloads as QR codes (error correction level M)
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    size_px: u32,
}

impl QrRenderer {
    pub fn new(size_px: u32) -> Self {
        Self { size_px }
    }

    fn code(payload: &str) -> Result<QrCode, HandoverError> {
        QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| HandoverError::ImageProcessing(format!("QR encoding failed: {}", e)))
    }

    /// PNG of at least `size_px` x `size_px` pixels.
    pub fn render_png(&self, payload: &str) -> Result<Vec<u8>, HandoverError> {
        let image = Self::code(payload)?
            .render::<Luma<u8>>()
            .min_dimensions(self.size_px, self.size_px)
            .build();

        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| HandoverError::ImageProcessing(format!("QR PNG encoding failed: {}", e)))?;
        Ok(buffer.into_inner())
    }

    pub fn render_png_base64(&self, payload: &str) -> Result<String, HandoverError> {
        let png = self.render_png(payload)?;
        Ok(general_purpose::STANDARD.encode(png))
    }

    /// Half-block rendering for terminals.
    pub fn render_terminal(payload: &str) -> Result<String, HandoverError> {
        Ok(Self::code(payload)?
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Dark)
            .light_color(unicode::Dense1x2::Light)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    const PAYLOAD: &str = "SPD*1.0*ACC:CZ3130300000001974047020*RN:Jan Novák*AM:500.00*CC:CZK";

    #[test]
    fn test_png_has_requested_size() {
        let png = QrRenderer::new(180).render_png(PAYLOAD).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        let (w, h) = decoded.dimensions();
        assert_eq!(w, h);
        assert!(w >= 180);
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_base64_output() {
        let encoded = QrRenderer::new(120).render_png_base64(PAYLOAD).unwrap();
        let raw = general_purpose::STANDARD.decode(&encoded).unwrap();
        assert!(raw.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_terminal_rendering() {
        let text = QrRenderer::render_terminal(PAYLOAD).unwrap();
        assert!(text.lines().count() > 10);
        assert!(text.contains('█') || text.contains('▀') || text.contains('▄'));
    }
}
