use chrono::Local;
use handlebars::Handlebars;
use handover_core::{format_weight, yes_no, HandoverError, Seller, Vehicle};
use serde::Serialize;

use super::DocumentKind;
use crate::photo::EncodedPhoto;

const PROTOCOL_TEMPLATE: &str = include_str!("../../templates/protocol.hbs");
const SUMMARY_TEMPLATE: &str = include_str!("../../templates/summary.hbs");

/// Resolved logo data URLs, empty when unavailable
#[derive(Debug, Clone, Default, Serialize)]
pub struct Logos {
    pub top_right: String,
    pub bottom_left: String,
}

#[derive(Serialize)]
struct SellerView {
    full_name: String,
    birth_date: String,
    email: String,
    phone: String,
    id_number: String,
    account: String,
    amount: String,
}

#[derive(Serialize)]
struct VehicleView {
    brand_model: String,
    plate: String,
    year: i32,
    vin: String,
    operating_weight: String,
    curb_weight: String,
    catalyst: &'static str,
    battery: &'static str,
    radio: &'static str,
    deposit: &'static str,
}

#[derive(Serialize)]
struct PhotoView {
    label: &'static str,
    src: String,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    heading: &'static str,
    logos: &'a Logos,
    seller: SellerView,
    vehicle: VehicleView,
    qr_src: Option<String>,
    currency: &'a str,
    photos: Vec<PhotoView>,
    generated_at: String,
}

/// Handlebars registry holding both document templates
pub struct DocumentTemplates {
    registry: Handlebars<'static>,
    currency: String,
}

impl DocumentTemplates {
    pub fn new(currency: impl Into<String>) -> Result<Self, HandoverError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string("protocol", PROTOCOL_TEMPLATE)
            .map_err(|e| HandoverError::Render(format!("Invalid protocol template: {}", e)))?;
        registry
            .register_template_string("summary", SUMMARY_TEMPLATE)
            .map_err(|e| HandoverError::Render(format!("Invalid summary template: {}", e)))?;

        Ok(Self {
            registry,
            currency: currency.into(),
        })
    }

    fn view<'a>(
        &'a self,
        kind: DocumentKind,
        seller: &Seller,
        vehicle: &Vehicle,
        photos: &[EncodedPhoto],
        logos: &'a Logos,
    ) -> DocumentView<'a> {
        DocumentView {
            heading: kind.heading(),
            logos,
            seller: SellerView {
                full_name: seller.full_name(),
                birth_date: seller.birth_date.clone(),
                email: seller.email.clone(),
                phone: seller.phone.clone(),
                id_number: seller.id_number.clone(),
                account: seller.account.to_string(),
                amount: seller.amount.to_fixed2(),
            },
            vehicle: VehicleView {
                brand_model: vehicle.brand_and_model(),
                plate: vehicle.plate.clone(),
                year: vehicle.year,
                vin: vehicle.vin.to_string(),
                operating_weight: format_weight(vehicle.operating_weight_kg),
                curb_weight: format_weight(vehicle.curb_weight_kg),
                catalyst: yes_no(vehicle.catalyst),
                battery: yes_no(vehicle.battery),
                radio: yes_no(vehicle.radio),
                deposit: yes_no(vehicle.deposit),
            },
            qr_src: seller
                .qr_png_base64
                .as_ref()
                .filter(|b64| !b64.is_empty())
                .map(|b64| format!("data:image/png;base64,{}", b64)),
            currency: &self.currency,
            photos: photos
                .iter()
                .filter(|p| !p.is_omitted())
                .map(|p| PhotoView {
                    label: p.slot.label(),
                    src: format!("data:image/jpeg;base64,{}", p.base64),
                })
                .collect(),
            generated_at: Local::now().format("%-d. %-m. %Y %-H:%M:%S").to_string(),
        }
    }

    pub fn render(
        &self,
        kind: DocumentKind,
        seller: &Seller,
        vehicle: &Vehicle,
        photos: &[EncodedPhoto],
        logos: &Logos,
    ) -> Result<String, HandoverError> {
        let name = match kind {
            DocumentKind::Protocol => "protocol",
            DocumentKind::Summary => "summary",
        };
        let view = self.view(kind, seller, vehicle, photos, logos);
        self.registry
            .render(name, &view)
            .map_err(|e| HandoverError::Render(format!("Failed to render {}: {}", name, e)))
    }
}
