use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::error::HandoverError;
use crate::validation::{
    current_year, invalid_field_names, is_valid_plate, is_valid_vin, normalize_plate,
    normalize_vin, parse_non_negative_decimal, parse_year,
};

/// Vehicle identification number, uppercase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    pub fn parse(input: &str) -> Option<Self> {
        is_valid_vin(input).then(|| Vin(normalize_vin(input)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vehicle form as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RawVehicleInput {
    #[validate(custom(function = "not_blank"))]
    pub brand: String,
    #[validate(custom(function = "not_blank"))]
    pub model: String,
    #[validate(custom(function = "plate_field"))]
    pub plate: String,
    /// Checked separately against the current year
    pub year: String,
    #[validate(custom(function = "vin_field"))]
    pub vin: String,
    #[validate(custom(function = "weight_field"))]
    pub operating_weight: String,
    #[validate(custom(function = "weight_field"))]
    pub curb_weight: String,
    pub catalyst: bool,
    pub battery: bool,
    pub radio: bool,
    pub deposit: bool,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn plate_field(value: &str) -> Result<(), ValidationError> {
    if is_valid_plate(value) {
        Ok(())
    } else {
        Err(ValidationError::new("plate"))
    }
}

fn vin_field(value: &str) -> Result<(), ValidationError> {
    if is_valid_vin(value) {
        Ok(())
    } else {
        Err(ValidationError::new("vin"))
    }
}

fn weight_field(value: &str) -> Result<(), ValidationError> {
    parse_non_negative_decimal(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("weight"))
}

impl RawVehicleInput {
    pub fn into_vehicle(self) -> Result<Vehicle, HandoverError> {
        self.into_vehicle_at(current_year())
    }

    /// Same as [`RawVehicleInput::into_vehicle`] with an explicit current year.
    pub fn into_vehicle_at(self, current_year: i32) -> Result<Vehicle, HandoverError> {
        let mut invalid = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => invalid_field_names(&errors),
        };

        let year = parse_year(&self.year, current_year);
        if year.is_none() {
            invalid.push("year".to_string());
            invalid.sort();
        }
        if !invalid.is_empty() {
            return Err(HandoverError::invalid_fields(invalid));
        }

        let invalid_field = |name: &str| HandoverError::invalid_fields([name]);
        Ok(Vehicle {
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            plate: normalize_plate(&self.plate),
            year: year.ok_or_else(|| invalid_field("year"))?,
            vin: Vin::parse(&self.vin).ok_or_else(|| invalid_field("vin"))?,
            operating_weight_kg: parse_non_negative_decimal(&self.operating_weight)
                .ok_or_else(|| invalid_field("operating_weight"))?,
            curb_weight_kg: parse_non_negative_decimal(&self.curb_weight)
                .ok_or_else(|| invalid_field("curb_weight"))?,
            catalyst: self.catalyst,
            battery: self.battery,
            radio: self.radio,
            deposit: self.deposit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub vin: Vin,
    pub operating_weight_kg: Decimal,
    pub curb_weight_kg: Decimal,
    pub catalyst: bool,
    pub battery: bool,
    pub radio: bool,
    pub deposit: bool,
}

impl Vehicle {
    /// Plate, or the VIN when no plate is known. Used in file names.
    pub fn identifier(&self) -> &str {
        if self.plate.is_empty() {
            self.vin.as_str()
        } else {
            &self.plate
        }
    }

    pub fn brand_and_model(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// `1250 kg`
pub fn format_weight(value: Decimal) -> String {
    format!("{} kg", value.normalize())
}
