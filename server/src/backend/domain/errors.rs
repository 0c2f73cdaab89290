//! Error types for the donor domain.

use thiserror::Error;

/// Why a phone number was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneNumberError {
    #[error("Phone number must have exactly 10 digits (got {0})")]
    WrongLength(usize),
    #[error("Phone number cannot be a single repeated digit")]
    RepeatedDigit,
    #[error("Phone number cannot start with 0 or 1")]
    InvalidPrefix,
    #[error("Phone number looks like a placeholder")]
    Placeholder,
}

/// Form-level validation failures, reported before any store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidPhoneNumber(#[from] PhoneNumberError),
    #[error("Invalid gender: {0}")]
    InvalidGender(String),
    #[error("Invalid blood type: {0}")]
    InvalidBloodType(String),
}

#[derive(Debug, Error)]
pub enum DonorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A donor with this name and phone number already exists.")]
    Duplicate,
    #[error("{0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export.")]
    NoData,
    #[error("{0}")]
    Failed(#[from] anyhow::Error),
}
