use crate::constants::{ACCOUNT_PAD_WIDTH, IBAN_COUNTRY_CODE};
use crate::models::AccountNumber;

use super::PaymentError;

/// Derive the Czech IBAN for a domestic account (`1974047020/3030`).
///
/// Whitespace is ignored. Anything that is not `1-10 digits "/" 4 digits`
/// is rejected with [`PaymentError::InvalidAccount`].
pub fn compute_cz_iban(account: &str) -> Result<String, PaymentError> {
    AccountNumber::parse(account).map(|acc| acc.to_iban())
}

/// Assemble the IBAN from already validated parts.
pub(crate) fn iban_from_parts(number: &str, bank_code: &str) -> String {
    let bban = format!("{}{:0>width$}", bank_code, number, width = ACCOUNT_PAD_WIDTH);
    let rearranged = format!("{}{}00", bban, IBAN_COUNTRY_CODE);
    let check = 98 - mod97(&numeral(&rearranged));
    format!("{}{:02}{}", IBAN_COUNTRY_CODE, check, bban)
}

/// Standard IBAN check: first four characters moved to the end, letters
/// transliterated, remainder modulo 97 must be 1.
pub fn verify_iban(iban: &str) -> bool {
    let compact: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if compact.len() < 5 || !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let (head, tail) = compact.split_at(4);
    mod97(&numeral(&format!("{}{}", tail, head))) == 1
}

/// Replace letters by `code - 55` (`A` = 10 .. `Z` = 35), keep digits.
fn numeral(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c.is_ascii_uppercase() {
            out.push_str(&(c as u32 - 55).to_string());
        }
    }
    out
}

// Digit-wise reduction, the accumulator never exceeds 96.
fn mod97(numeral: &str) -> u32 {
    numeral
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| (acc * 10 + d) % 97)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CZ_IBAN_LENGTH;

    #[test]
    fn test_golden_account() {
        assert_eq!(
            compute_cz_iban("1974047020/3030").unwrap(),
            "CZ3130300000001974047020"
        );
    }

    #[test]
    fn test_known_accounts() {
        assert_eq!(
            compute_cz_iban("2000145399/0800").unwrap(),
            "CZ7908000000002000145399"
        );
        assert_eq!(compute_cz_iban("1/0100").unwrap(), "CZ7401000000000000000001");
        assert_eq!(compute_cz_iban("123/0300").unwrap(), "CZ2503000000000000000123");
    }

    #[test]
    fn test_single_digit_check_is_padded() {
        assert_eq!(compute_cz_iban("0/0100").unwrap(), "CZ0401000000000000000000");
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(
            compute_cz_iban(" 1974 047020/3030 ").unwrap(),
            "CZ3130300000001974047020"
        );
    }

    #[test]
    fn test_derived_ibans_verify() {
        for account in [
            "1/0100",
            "19/2010",
            "123456/0710",
            "9999999999/6210",
            "1974047020/3030",
        ] {
            let iban = compute_cz_iban(account).unwrap();
            assert_eq!(iban.len(), CZ_IBAN_LENGTH, "{}", account);
            assert!(iban.starts_with("CZ"));
            assert!(verify_iban(&iban), "{} -> {}", account, iban);
        }
    }

    #[test]
    fn test_malformed_accounts_rejected() {
        for account in ["", "1974047020", "12345678901/3030", "1/010", "a1/0100", "1/0100/1"] {
            assert!(
                matches!(compute_cz_iban(account), Err(PaymentError::InvalidAccount(_))),
                "{}",
                account
            );
        }
    }

    #[test]
    fn test_verify_iban_rejects_tampering() {
        assert!(verify_iban("CZ31 3030 0000 0019 7404 7020"));
        assert!(!verify_iban("CZ3230300000001974047020"));
        assert!(!verify_iban("CZ3130300000001974047021"));
        assert!(!verify_iban("CZ31-3030"));
        assert!(!verify_iban("CZ3"));
    }
}
