//! Finishing pipeline: from a completed wizard to two shared documents

use handover_core::hooks::settle_share;
use handover_core::{
    Config, HandoverError, PhotoSet, Seller, ShareOutcome, ShareRequest, ShareTarget, Vehicle,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::assets::{LogoCache, LogoSlot};
use crate::document::{create_renderer, DocumentKind, DocumentTemplates, Logos};
use crate::photo::{
    estimate_base64_bytes, BudgetReport, EncodedPhoto, JpegPhotoEncoder, PhotoBudgetCompressor,
};
use crate::qr::QrRenderer;
use crate::traits::{PdfRenderer, PhotoEncoder};

#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub share: ShareOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandoverReport {
    pub run_id: Uuid,
    pub documents: Vec<DocumentOutcome>,
    pub budget: BudgetReport,
}

pub struct HandoverPipeline {
    compressor: PhotoBudgetCompressor,
    qr: QrRenderer,
    templates: DocumentTemplates,
    renderer: Arc<dyn PdfRenderer>,
    share: Arc<dyn ShareTarget>,
    logos: LogoCache,
    office_recipients: Vec<String>,
}

impl HandoverPipeline {
    pub fn new(
        config: &Config,
        encoder: Arc<dyn PhotoEncoder>,
        renderer: Arc<dyn PdfRenderer>,
        share: Arc<dyn ShareTarget>,
    ) -> Result<Self, HandoverError> {
        Ok(Self {
            compressor: PhotoBudgetCompressor::new(encoder, config.photo_budget().clone()),
            qr: QrRenderer::new(config.qr_size_px()),
            templates: DocumentTemplates::new(config.payment_currency())?,
            renderer,
            share,
            logos: LogoCache::new(
                config.logo_top_right().cloned(),
                config.logo_bottom_left().cloned(),
            ),
            office_recipients: config.office_recipients().to_vec(),
        })
    }

    /// Pipeline with the JPEG encoder and the configured renderer.
    pub fn from_config(config: &Config, share: Arc<dyn ShareTarget>) -> Result<Self, HandoverError> {
        Self::new(config, Arc::new(JpegPhotoEncoder), create_renderer(config), share)
    }

    pub fn logos(&self) -> &LogoCache {
        &self.logos
    }

    /// QR image for the seller's payment, if one can be produced.
    fn payment_qr(&self, seller: &Seller) -> Option<String> {
        if let Some(existing) = seller.qr_png_base64.as_ref().filter(|q| !q.is_empty()) {
            return Some(existing.clone());
        }

        let Some(payload) = seller.payment_payload.as_deref() else {
            tracing::warn!("No payment payload, documents will not contain a QR code");
            return None;
        };

        match self.qr.render_png_base64(payload) {
            Ok(png) => Some(png),
            Err(err) => {
                tracing::warn!(error = %err, "QR rendering failed, continuing without it");
                None
            }
        }
    }

    async fn render_and_share(
        &self,
        kind: DocumentKind,
        seller: &Seller,
        vehicle: &Vehicle,
        photos: &[EncodedPhoto],
        logos: &Logos,
    ) -> Result<DocumentOutcome, HandoverError> {
        let html = self.templates.render(kind, seller, vehicle, photos, logos)?;
        let path = self
            .renderer
            .render(&html, &kind.file_stem(seller, vehicle))
            .await?;

        tracing::info!(
            document = ?kind,
            renderer = self.renderer.name(),
            path = %path.display(),
            "Document rendered"
        );

        let recipients = match kind {
            DocumentKind::Protocol => self.office_recipients.clone(),
            DocumentKind::Summary => vec![seller.email.clone()],
        };
        let title = kind.share_title(&seller.last_name);
        let request = ShareRequest {
            subject: title.clone(),
            title,
            message: kind.share_message().to_string(),
            attachment: path.clone(),
            recipients,
        };

        let share = settle_share(self.share.share(&request).await)?;
        match share {
            ShareOutcome::Shared => {
                tracing::info!(document = ?kind, target = self.share.name(), "Document shared")
            }
            ShareOutcome::Cancelled => {
                tracing::info!(document = ?kind, target = self.share.name(), "Share cancelled by user")
            }
        }

        Ok(DocumentOutcome { kind, path, share })
    }

    /// Compress photos, render both documents and share them, in that order.
    ///
    /// A cancelled share is not an error. Any other failure stops the run;
    /// files written so far are left in place.
    pub async fn finish(
        &self,
        seller: &Seller,
        vehicle: &Vehicle,
        photos: &PhotoSet,
    ) -> Result<HandoverReport, HandoverError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("handover_finish", run_id = %run_id);

        async move {
            photos.require_complete()?;

            let mut seller = seller.clone();
            seller.qr_png_base64 = self.payment_qr(&seller);

            let logos = Logos {
                top_right: self.logos.get(LogoSlot::TopRight).await,
                bottom_left: self.logos.get(LogoSlot::BottomLeft).await,
            };

            let extra_bytes = seller
                .qr_png_base64
                .as_deref()
                .map(estimate_base64_bytes)
                .unwrap_or(0)
                + estimate_base64_bytes(&logos.top_right)
                + estimate_base64_bytes(&logos.bottom_left);

            let compressed = self.compressor.compress(photos, extra_bytes).await?;
            tracing::info!(
                dimension = compressed.report.dimension,
                quality = compressed.report.quality,
                passes = compressed.report.passes,
                total_bytes = compressed.report.total_bytes,
                budget_bytes = compressed.report.budget_bytes,
                "Photos prepared"
            );

            let protocol = self
                .render_and_share(
                    DocumentKind::Protocol,
                    &seller,
                    vehicle,
                    &compressed.photos,
                    &logos,
                )
                .await?;
            let summary = self
                .render_and_share(DocumentKind::Summary, &seller, vehicle, &[], &logos)
                .await?;

            Ok(HandoverReport {
                run_id,
                documents: vec![protocol, summary],
                budget: compressed.report,
            })
        }
        .instrument(span)
        .await
    }
}
