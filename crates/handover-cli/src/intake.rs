//! Intake files: one JSON document holding everything the wizard asks for.
//!
//! ```json
//! {
//!   "seller": { "first_name": "Jan", "account_number": "1974047020/3030", ... },
//!   "vehicle": { "brand": "Škoda", "vin": "TMBZZZ6UZW1234567", ... },
//!   "photos": { "front": "photos/front.jpg", "title_back": "photos/tp2.jpg", ... }
//! }
//! ```
//!
//! Relative photo paths are resolved against the intake file's directory.

use anyhow::Context;
use handover_core::{
    HandoverError, PhotoSlot, PhotoSource, RawSellerInput, RawVehicleInput, Wizard,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Intake {
    pub seller: RawSellerInput,
    pub vehicle: RawVehicleInput,
    pub photos: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Intake {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read intake file {}", path.display()))?;
        let mut intake: Intake = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid intake file {}", path.display()))?;
        intake.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(intake)
    }

    fn photo_sources(&self) -> Result<Vec<(PhotoSlot, PhotoSource)>, HandoverError> {
        self.photos
            .iter()
            .map(|(key, path)| {
                let slot = key
                    .parse::<PhotoSlot>()
                    .map_err(|e| HandoverError::InvalidInput(e.to_string()))?;
                Ok((slot, PhotoSource::new(self.base_dir.join(path))))
            })
            .collect()
    }

    /// Run the seller and vehicle stages and attach the photos.
    ///
    /// Stops at the first stage that does not validate.
    pub fn into_wizard(self, currency: &str) -> Result<Wizard, HandoverError> {
        let photos = self.photo_sources()?;

        let mut wizard = Wizard::new(currency);
        wizard.submit_seller(self.seller)?;
        wizard.submit_vehicle(self.vehicle)?;
        for (slot, source) in photos {
            wizard.set_photo(slot, source)?;
        }
        Ok(wizard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handover_core::WizardStage;

    const INTAKE: &str = r#"{
        "seller": {
            "first_name": "Jan",
            "last_name": "Novák",
            "birth_date": "12031985",
            "email": "jan@example.cz",
            "phone": "777123456",
            "id_number": "AB123456",
            "account_number": "1974047020/3030",
            "amount": "1500"
        },
        "vehicle": {
            "brand": "Škoda",
            "model": "Octavia",
            "plate": "2AB 3456",
            "year": "2001",
            "vin": "TMBZZZ1UZ12345678",
            "operating_weight": "1275",
            "curb_weight": "1200",
            "catalyst": true
        },
        "photos": {
            "front": "front.jpg",
            "interior": "/abs/interior.jpg",
            "tpfront": "tp1.jpg"
        }
    }"#;

    #[tokio::test]
    async fn test_load_and_build_wizard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.json");
        std::fs::write(&path, INTAKE).unwrap();

        let intake = Intake::load(&path).await.unwrap();
        let wizard = intake.into_wizard("CZK").unwrap();

        assert_eq!(wizard.stage(), WizardStage::Photos);
        assert_eq!(
            wizard.seller().unwrap().iban.as_deref(),
            Some("CZ3130300000001974047020")
        );
        assert_eq!(wizard.seller().unwrap().birth_date, "12.03.1985");
        assert_eq!(
            wizard.photos().get(PhotoSlot::Front).unwrap().path(),
            dir.path().join("front.jpg")
        );
        assert_eq!(
            wizard.photos().get(PhotoSlot::Interior).unwrap().path(),
            Path::new("/abs/interior.jpg")
        );
        assert!(wizard.photos().get(PhotoSlot::TitleFront).is_some());
        assert_eq!(
            wizard.photos().missing(),
            vec![PhotoSlot::Vin, PhotoSlot::TitleBack]
        );
    }

    #[test]
    fn test_invalid_seller_stops_wizard() {
        let mut intake: Intake = serde_json::from_str(INTAKE).unwrap();
        intake.seller.account_number = "12/34".to_string();
        let err = intake.into_wizard("CZK").unwrap_err();
        assert!(matches!(err, HandoverError::Validation(ref f) if f.contains("account_number")));
    }

    #[test]
    fn test_unknown_photo_slot() {
        let mut intake: Intake = serde_json::from_str(INTAKE).unwrap();
        intake.photos.insert("roof".to_string(), PathBuf::from("roof.jpg"));
        let err = intake.into_wizard("CZK").unwrap_err();
        assert!(matches!(err, HandoverError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Intake::load(Path::new("/no/such/intake.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("intake.json"));
    }
}
