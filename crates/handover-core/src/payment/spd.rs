use crate::constants::{SPD_DELIMITER, SPD_VERSION_TAG};
use crate::models::Amount;

use super::PaymentError;

/// Build the SPD payload `SPD*1.0*ACC:<iban>*RN:<first last>*AM:<0.00>*CC:<currency>`.
///
/// Free-text fields are not escaped; a `*` inside any of them is reported as
/// [`PaymentError::DelimiterInField`].
pub fn make_spd_payload(
    iban: &str,
    first_name: &str,
    last_name: &str,
    amount: &Amount,
    currency: &str,
) -> Result<String, PaymentError> {
    for (field, value) in [
        ("iban", iban),
        ("first_name", first_name),
        ("last_name", last_name),
        ("currency", currency),
    ] {
        if value.contains(SPD_DELIMITER) {
            return Err(PaymentError::DelimiterInField { field });
        }
    }

    Ok(format!(
        "{tag}*ACC:{iban}*RN:{first} {last}*AM:{amount}*CC:{currency}",
        tag = SPD_VERSION_TAG,
        iban = iban,
        first = first_name,
        last = last_name,
        amount = amount.to_fixed2(),
        currency = currency,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    #[test]
    fn test_payload_format() {
        let payload = make_spd_payload(
            "CZ3130300000001974047020",
            "Jan",
            "Novák",
            &amount("500"),
            "CZK",
        )
        .unwrap();
        assert_eq!(
            payload,
            "SPD*1.0*ACC:CZ3130300000001974047020*RN:Jan Novák*AM:500.00*CC:CZK"
        );
    }

    #[test]
    fn test_amount_always_two_decimals() {
        for (input, expected) in [("1000", "1000.00"), ("1000,50", "1000.50"), ("1000.5", "1000.50")] {
            let payload =
                make_spd_payload("CZ00", "A", "B", &amount(input), "CZK").unwrap();
            assert!(payload.contains(&format!("*AM:{}*", expected)), "{}", payload);
        }
    }

    #[test]
    fn test_custom_currency() {
        let payload = make_spd_payload("CZ00", "A", "B", &amount("1"), "EUR").unwrap();
        assert!(payload.ends_with("*CC:EUR"));
    }

    #[test]
    fn test_delimiter_in_name_is_reported() {
        let err = make_spd_payload("CZ00", "Jan*", "Novák", &amount("1"), "CZK").unwrap_err();
        assert_eq!(err, PaymentError::DelimiterInField { field: "first_name" });

        let err = make_spd_payload("CZ00", "Jan", "No*vák", &amount("1"), "CZK").unwrap_err();
        assert_eq!(err, PaymentError::DelimiterInField { field: "last_name" });
    }
}
