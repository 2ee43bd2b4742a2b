//! Custom `validator` functions shared by the request bodies. The rules
//! match what the intake forms enforce: phone numbers carry at least 10
//! digits once separators are stripped, and list fields reject blank or
//! malformed entries.

use validator::{ValidateEmail, ValidationError};

const MIN_PHONE_DIGITS: usize = 10;

/// A phone number is valid when it contains at least 10 digits after
/// stripping every non-digit character (spaces, dashes, "+", parentheses).
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        let mut err = ValidationError::new("phone");
        err.message = Some("phone number must contain at least 10 digits".into());
        return Err(err);
    }
    Ok(())
}

/// Every entry must be a well-formed email address.
pub fn validate_email_list(values: &[String]) -> Result<(), ValidationError> {
    for value in values {
        if !value.validate_email() {
            let mut err = ValidationError::new("email");
            err.message = Some(format!("invalid email address: {value}").into());
            return Err(err);
        }
    }
    Ok(())
}

/// Every entry must pass the phone rule.
pub fn validate_phone_list(values: &[String]) -> Result<(), ValidationError> {
    for value in values {
        validate_phone(value)?;
    }
    Ok(())
}
