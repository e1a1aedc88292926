use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::payment::iban::iban_from_parts;
use crate::payment::PaymentError;
use crate::validation::{is_valid_account_number, normalize_account_number};

/// Domestic Czech account number, `number/bank_code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber {
    number: String,
    bank_code: String,
}

impl AccountNumber {
    pub fn parse(input: &str) -> Result<Self, PaymentError> {
        let normalized = normalize_account_number(input);
        if !is_valid_account_number(&normalized) {
            return Err(PaymentError::InvalidAccount(input.to_string()));
        }
        let (number, bank_code) = normalized
            .split_once('/')
            .ok_or_else(|| PaymentError::InvalidAccount(input.to_string()))?;
        Ok(Self {
            number: number.to_string(),
            bank_code: bank_code.to_string(),
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn bank_code(&self) -> &str {
        &self.bank_code
    }

    pub fn to_iban(&self) -> String {
        iban_from_parts(&self.number, &self.bank_code)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.bank_code)
    }
}

impl FromStr for AccountNumber {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(account: AccountNumber) -> Self {
        account.to_string()
    }
}
