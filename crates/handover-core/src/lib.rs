//! Handover Core Library
//!
//! This crate provides the domain models, validation, payment payload logic,
//! error types and configuration shared by every handover component.

pub mod backend_types;
pub mod config;
pub mod constants;
pub mod error;
pub mod filename;
pub mod hooks;
pub mod models;
pub mod payment;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use backend_types::{RendererKind, ShareKind};
pub use config::{Config, HandoverConfig, PhotoBudgetConfig, SmtpConfig};
pub use error::{ErrorMetadata, HandoverError, LogLevel, GENERIC_FAILURE_MESSAGE};
pub use hooks::{NoOpShareTarget, ShareError, ShareOutcome, ShareRequest, ShareTarget};
pub use models::{
    format_weight, yes_no, AccountNumber, Amount, AssetSource, PhotoSet, PhotoSlot, PhotoSource,
    RawSellerInput, RawVehicleInput, Seller, Vehicle, Vin,
};
pub use payment::{compute_cz_iban, make_spd_payload, verify_iban, PaymentError};
pub use wizard::{DocumentInputs, Wizard, WizardStage, WizardState};
