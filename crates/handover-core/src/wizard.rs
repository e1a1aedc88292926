//! Wizard controller
//!
//! The whole state of one handover lives in a single [`WizardState`] owned by
//! [`Wizard`]. Stages only move forward through successful submits, `back()`
//! steps one stage back and `reset()` clears everything.

use serde::Serialize;
use std::fmt;

use crate::error::HandoverError;
use crate::models::{PhotoSet, PhotoSlot, PhotoSource, RawSellerInput, RawVehicleInput, Seller, Vehicle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStage {
    #[default]
    Seller,
    Vehicle,
    Photos,
    Complete,
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStage::Seller => "seller",
            WizardStage::Vehicle => "vehicle",
            WizardStage::Photos => "photos",
            WizardStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub stage: WizardStage,
    pub seller: Option<Seller>,
    pub vehicle: Option<Vehicle>,
    pub photos: PhotoSet,
}

/// Borrowed view of everything the documents are built from
#[derive(Debug, Clone, Copy)]
pub struct DocumentInputs<'a> {
    pub seller: &'a Seller,
    pub vehicle: &'a Vehicle,
    pub photos: &'a PhotoSet,
}

#[derive(Debug)]
pub struct Wizard {
    state: WizardState,
    currency: String,
}

impl Wizard {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            state: WizardState::default(),
            currency: currency.into(),
        }
    }

    pub fn stage(&self) -> WizardStage {
        self.state.stage
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn seller(&self) -> Option<&Seller> {
        self.state.seller.as_ref()
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.state.vehicle.as_ref()
    }

    pub fn photos(&self) -> &PhotoSet {
        &self.state.photos
    }

    fn require_stage(&self, expected: WizardStage) -> Result<(), HandoverError> {
        if self.state.stage != expected {
            return Err(HandoverError::InvalidInput(format!(
                "Action requires stage '{}', wizard is at '{}'",
                expected, self.state.stage
            )));
        }
        Ok(())
    }

    /// Validate the seller form, derive IBAN and payment payload, move on.
    pub fn submit_seller(&mut self, raw: RawSellerInput) -> Result<&Seller, HandoverError> {
        self.require_stage(WizardStage::Seller)?;

        let mut seller = raw.into_seller()?;
        seller.derive_payment(&self.currency)?;

        tracing::debug!(iban = ?seller.iban, "Seller accepted");
        self.state.stage = WizardStage::Vehicle;
        Ok(self.state.seller.insert(seller))
    }

    pub fn submit_vehicle(&mut self, raw: RawVehicleInput) -> Result<&Vehicle, HandoverError> {
        self.require_stage(WizardStage::Vehicle)?;

        let vehicle = raw.into_vehicle()?;

        tracing::debug!(vin = %vehicle.vin, "Vehicle accepted");
        self.state.stage = WizardStage::Photos;
        Ok(self.state.vehicle.insert(vehicle))
    }

    /// Step one stage back. Entered data is kept.
    pub fn back(&mut self) -> WizardStage {
        self.state.stage = match self.state.stage {
            WizardStage::Seller | WizardStage::Vehicle => WizardStage::Seller,
            WizardStage::Photos => WizardStage::Vehicle,
            WizardStage::Complete => WizardStage::Photos,
        };
        self.state.stage
    }

    pub fn set_photo(&mut self, slot: PhotoSlot, source: PhotoSource) -> Result<(), HandoverError> {
        self.require_stage(WizardStage::Photos)?;
        self.state.photos.set(slot, source);
        Ok(())
    }

    pub fn clear_photo(&mut self, slot: PhotoSlot) -> Result<Option<PhotoSource>, HandoverError> {
        self.require_stage(WizardStage::Photos)?;
        Ok(self.state.photos.clear(slot))
    }

    /// Everything needed for document generation, once all five photos are set.
    pub fn ready_for_documents(&self) -> Result<DocumentInputs<'_>, HandoverError> {
        self.require_stage(WizardStage::Photos)?;

        let seller = self
            .state
            .seller
            .as_ref()
            .ok_or_else(|| HandoverError::InvalidInput("No seller submitted".to_string()))?;
        let vehicle = self
            .state
            .vehicle
            .as_ref()
            .ok_or_else(|| HandoverError::InvalidInput("No vehicle submitted".to_string()))?;
        self.state.photos.require_complete()?;

        Ok(DocumentInputs {
            seller,
            vehicle,
            photos: &self.state.photos,
        })
    }

    pub fn mark_complete(&mut self) -> Result<(), HandoverError> {
        self.ready_for_documents()?;
        self.state.stage = WizardStage::Complete;
        Ok(())
    }

    /// Forget everything and start over.
    pub fn reset(&mut self) {
        self.state = WizardState::default();
    }
}
