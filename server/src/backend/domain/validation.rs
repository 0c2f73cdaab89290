//! Pure helpers that turn raw form input into accepted, normalized values.

use shared::{BloodType, CreateDonorRequest, Gender};

use crate::backend::domain::errors::{PhoneNumberError, ValidationError};
use crate::backend::domain::models::donor::NewDonor;

pub const PHONE_NUMBER_LENGTH: usize = 10;
pub const MIN_DONOR_AGE: u8 = 14;
pub const MAX_DONOR_AGE: u8 = 80;

/// Numbers volunteers type when they do not have the real one
const PLACEHOLDER_NUMBERS: [&str; 4] = ["1234567890", "9876543210", "9898989898", "9000000000"];

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Strip formatting from a phone number and check it is a plausible
/// 10-digit mobile number. Returns the digits on success.
pub fn validate_phone_number(raw: &str) -> Result<String, PhoneNumberError> {
    let digits = digits_only(raw);

    if digits.len() != PHONE_NUMBER_LENGTH {
        return Err(PhoneNumberError::WrongLength(digits.len()));
    }

    let first = digits.as_bytes()[0];
    if digits.bytes().all(|b| b == first) {
        return Err(PhoneNumberError::RepeatedDigit);
    }
    if first == b'0' || first == b'1' {
        return Err(PhoneNumberError::InvalidPrefix);
    }
    if PLACEHOLDER_NUMBERS.contains(&digits.as_str()) {
        return Err(PhoneNumberError::Placeholder);
    }

    Ok(digits)
}

pub fn is_valid_phone_number(raw: &str) -> bool {
    validate_phone_number(raw).is_ok()
}

/// Trim and collapse internal whitespace runs to a single space
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for duplicate detection
pub fn name_key(raw: &str) -> String {
    normalize_name(raw).to_lowercase()
}

/// Digits-only age clamped into the accepted donor range; empty input is `None`
pub fn clamp_age(raw: &str) -> Option<u8> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return None;
    }
    // Anything too long to parse is certainly above the maximum
    let age = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(age.clamp(MIN_DONOR_AGE as u64, MAX_DONOR_AGE as u64) as u8)
}

/// Validate the add-donor form and produce a storable registration
pub fn validate_new_donor(request: &CreateDonorRequest) -> Result<NewDonor, ValidationError> {
    let name = normalize_name(&request.name);
    if name.is_empty() {
        return Err(ValidationError::MissingField("Name"));
    }

    if request.gender.trim().is_empty() {
        return Err(ValidationError::MissingField("Gender"));
    }
    let gender: Gender = request
        .gender
        .parse()
        .map_err(|_| ValidationError::InvalidGender(request.gender.trim().to_string()))?;

    if request.blood_type.trim().is_empty() {
        return Err(ValidationError::MissingField("Blood type"));
    }
    let blood_type: BloodType = request
        .blood_type
        .parse()
        .map_err(|_| ValidationError::InvalidBloodType(request.blood_type.trim().to_string()))?;

    if request.phone_number.trim().is_empty() {
        return Err(ValidationError::MissingField("Phone number"));
    }
    let phone_number = validate_phone_number(&request.phone_number)?;

    Ok(NewDonor {
        name,
        gender,
        blood_type,
        phone_number,
        age: request.age.as_deref().and_then(clamp_age),
        address: request.address.as_deref().unwrap_or_default().trim().to_string(),
        city: request.city.as_deref().unwrap_or_default().trim().to_string(),
        is_first_time: request.is_first_time,
        is_dikshit: request.is_dikshit,
    })
}
