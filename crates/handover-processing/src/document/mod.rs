//! Handover documents: templates and rendering

mod renderer;
mod templates;

pub use renderer::{create_renderer, CommandPdfRenderer, HtmlFileRenderer};
pub use templates::{DocumentTemplates, Logos};

use handover_core::constants::{PROTOCOL_FILE_PREFIX, SUMMARY_FILE_PREFIX};
use handover_core::filename::document_file_stem;
use handover_core::{Seller, Vehicle};
use serde::Serialize;

/// The two documents produced for every handover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Full handover protocol with photos, sent to the office
    Protocol,
    /// Short summary, sent to the seller
    Summary,
}

impl DocumentKind {
    pub fn heading(self) -> &'static str {
        match self {
            DocumentKind::Protocol => "Předávací protokol vozidla k ekologické likvidaci",
            DocumentKind::Summary => "Souhrn předání vozidla k ekologické likvidaci",
        }
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            DocumentKind::Protocol => PROTOCOL_FILE_PREFIX,
            DocumentKind::Summary => SUMMARY_FILE_PREFIX,
        }
    }

    /// Title and e-mail subject of the share
    pub fn share_title(self, surname: &str) -> String {
        match self {
            DocumentKind::Protocol => format!("Předávací protokol - {}", surname),
            DocumentKind::Summary => format!("Souhrn předání vozidla - {}", surname),
        }
    }

    pub fn share_message(self) -> &'static str {
        match self {
            DocumentKind::Protocol => "Předávací protokol",
            DocumentKind::Summary => "Souhrn předání vozidla k ekologické likvidaci",
        }
    }

    pub fn file_stem(self, seller: &Seller, vehicle: &Vehicle) -> String {
        document_file_stem(
            self.file_prefix(),
            &seller.last_name,
            &seller.first_name,
            vehicle.identifier(),
        )
    }
}
