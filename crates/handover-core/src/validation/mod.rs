//! Validation modules

pub mod birth_date;
pub mod fields;

pub use birth_date::{format_birth_date, parse_birth_date};
pub use fields::{
    current_year, is_valid_account_number, is_valid_plate, is_valid_vin, normalize_account_number,
    normalize_plate, normalize_vin, parse_non_negative_decimal, parse_year,
};

use validator::ValidationErrors;

/// Sorted names of the fields that failed validation.
pub fn invalid_field_names(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();
    fields
}
