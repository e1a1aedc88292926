use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{AccountNumber, Amount};
use crate::error::HandoverError;
use crate::payment::{make_spd_payload, PaymentError};
use crate::validation::{
    format_birth_date, is_valid_account_number, parse_birth_date, parse_non_negative_decimal,
};

/// Seller form as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RawSellerInput {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(custom(function = "birth_date_field"))]
    pub birth_date: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    /// Identity document number
    #[validate(custom(function = "not_blank"))]
    pub id_number: String,
    #[validate(custom(function = "account_field"))]
    pub account_number: String,
    #[validate(custom(function = "amount_field"))]
    pub amount: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn birth_date_field(value: &str) -> Result<(), ValidationError> {
    let today = chrono::Local::now().date_naive();
    parse_birth_date(value, today)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("birth_date"))
}

fn account_field(value: &str) -> Result<(), ValidationError> {
    if is_valid_account_number(value) {
        Ok(())
    } else {
        Err(ValidationError::new("account_number"))
    }
}

fn amount_field(value: &str) -> Result<(), ValidationError> {
    parse_non_negative_decimal(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("amount"))
}

impl RawSellerInput {
    fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: format_birth_date(&self.birth_date),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            account_number: self.account_number,
            amount: self.amount.trim().to_string(),
        }
    }

    /// Validate every field and build the seller record.
    pub fn into_seller(self) -> Result<Seller, HandoverError> {
        let input = self.trimmed();
        input.validate()?;

        let account = AccountNumber::parse(&input.account_number)?;
        let amount = Amount::parse(&input.amount)?;

        Ok(Seller {
            first_name: input.first_name,
            last_name: input.last_name,
            birth_date: input.birth_date,
            email: input.email,
            phone: input.phone,
            id_number: input.id_number,
            account,
            amount,
            iban: None,
            payment_payload: None,
            qr_png_base64: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub first_name: String,
    pub last_name: String,
    /// `DD.MM.YYYY`
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub account: AccountNumber,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_payload: Option<String>,
    /// Base64 PNG of the payment QR code
    #[serde(skip)]
    pub qr_png_base64: Option<String>,
}

impl Seller {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fill in the IBAN and the SPD payload.
    pub fn derive_payment(&mut self, currency: &str) -> Result<(), PaymentError> {
        let iban = self.account.to_iban();
        let payload = make_spd_payload(
            &iban,
            &self.first_name,
            &self.last_name,
            &self.amount,
            currency,
        )?;
        self.iban = Some(iban);
        self.payment_payload = Some(payload);
        Ok(())
    }
}
