use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::payment::PaymentError;
use crate::validation::parse_non_negative_decimal;

/// Non-negative money amount in the payment currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    /// Parse user input; both `1000,50` and `1000.50` are accepted.
    pub fn parse(input: &str) -> Result<Self, PaymentError> {
        parse_non_negative_decimal(input)
            .map(Amount)
            .ok_or_else(|| PaymentError::InvalidAmount(input.to_string()))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Exactly two decimals, half away from zero.
    pub fn to_fixed2(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed2())
    }
}

impl TryFrom<String> for Amount {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_fixed2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed2() {
        assert_eq!(Amount::parse("1000").unwrap().to_fixed2(), "1000.00");
        assert_eq!(Amount::parse("1000,50").unwrap().to_fixed2(), "1000.50");
        assert_eq!(Amount::parse("1000.5").unwrap().to_fixed2(), "1000.50");
        assert_eq!(Amount::parse("0").unwrap().to_fixed2(), "0.00");
        assert_eq!(Amount::parse("12.345").unwrap().to_fixed2(), "12.35");
        assert_eq!(Amount::parse("12.344").unwrap().to_fixed2(), "12.34");
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert!(matches!(Amount::parse("-1"), Err(PaymentError::InvalidAmount(_))));
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("pět set").is_err());
    }
}
