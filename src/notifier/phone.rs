//! Phone number normalization

use phonenumber::{country, Mode};

use crate::errors::{AppError, AppResult, PhoneRole};

/// Region assumed for numbers entered without a country code
pub const DEFAULT_REGION: country::Id = country::Id::US;

/// Normalize a human-entered number to E.164 (`+15551234567`)
pub fn to_e164(raw: &str, role: PhoneRole) -> AppResult<String> {
    let input = raw.trim();
    if !input.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidPhoneNumber {
            role,
            input: input.to_string(),
            source: None,
        });
    }

    let number = phonenumber::parse(Some(DEFAULT_REGION), input)
        .map_err(|e| AppError::invalid_phone_number(role, input, e))?;
    Ok(number.format().mode(Mode::E164).to_string())
}
