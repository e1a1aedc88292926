//! Single-field validators shared by the seller and vehicle forms.

use chrono::Datelike;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::constants::MIN_MANUFACTURE_YEAR;

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,10}/[0-9]{4}$").expect("account pattern is valid"));

// 17 characters, I, O and Q never appear in a VIN.
static VIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("VIN pattern is valid"));

static PLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{7,8}$").expect("plate pattern is valid"));

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern is valid"));

/// Account numbers are typed with arbitrary spacing; all whitespace is dropped.
pub fn normalize_account_number(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `1-10 digits "/" 4 digits`, checked after whitespace removal.
pub fn is_valid_account_number(input: &str) -> bool {
    ACCOUNT_RE.is_match(&normalize_account_number(input))
}

pub fn normalize_vin(input: &str) -> String {
    input.trim().to_uppercase()
}

pub fn is_valid_vin(input: &str) -> bool {
    VIN_RE.is_match(&normalize_vin(input))
}

/// Plates are compared without inner spaces, uppercased (`1AB 2345` -> `1AB2345`).
pub fn normalize_plate(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub fn is_valid_plate(input: &str) -> bool {
    PLATE_RE.is_match(&normalize_plate(input))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Parse a manufacture year within `[1900, current_year]`.
pub fn parse_year(input: &str, current_year: i32) -> Option<i32> {
    let trimmed = input.trim();
    if !YEAR_RE.is_match(trimmed) {
        return None;
    }
    let year: i32 = trimmed.parse().ok()?;
    (MIN_MANUFACTURE_YEAR..=current_year)
        .contains(&year)
        .then_some(year)
}

/// Parse a non-negative decimal, accepting `,` as the decimal separator.
pub fn parse_non_negative_decimal(input: &str) -> Option<Decimal> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    let value = Decimal::from_str(&normalized).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value)
}
