//! Payment details derived from the seller's bank account
//!
//! The seller enters a domestic account (`number/bank_code`). From it the
//! Czech IBAN is derived and, together with the payee name and amount, an SPD
//! ("Short Payment Descriptor") payload that banking apps read from a QR code.

pub mod iban;
pub mod spd;

pub use iban::{compute_cz_iban, verify_iban};
pub use spd::make_spd_payload;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Invalid account number: {0}")]
    InvalidAccount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Field '{field}' contains the SPD delimiter '*'")]
    DelimiterInField { field: &'static str },
}
