//! Handover Processing Library
//!
//! Everything between a completed wizard and the shared documents: photo
//! re-encoding under a byte budget, the payment QR code, logo resolution,
//! HTML templates, PDF rendering and the finishing pipeline.

pub mod assets;
pub mod document;
pub mod photo;
pub mod pipeline;
pub mod qr;
pub mod traits;

pub use assets::{resolve_asset, LogoCache, LogoSlot};
pub use document::{
    create_renderer, CommandPdfRenderer, DocumentKind, DocumentTemplates, HtmlFileRenderer,
    Logos,
};
pub use photo::{
    estimate_base64_bytes, BudgetReport, CompressedPhotos, EncodedPhoto, JpegPhotoEncoder,
    PhotoBudgetCompressor,
};
pub use pipeline::{DocumentOutcome, HandoverPipeline, HandoverReport};
pub use qr::QrRenderer;
pub use traits::{PdfRenderer, PhotoEncoder};
