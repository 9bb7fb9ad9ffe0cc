// =====================================================================================
// BOOKING FORM VALIDATION
// =====================================================================================

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::models::{AppointmentError, BookingForm};

// Country code 84 (optionally with the mobile prefix digit) or a local
// 03/05/07/08/09 prefix, then eight digits.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:84[35789]?[0-9]{8}|0[35789][0-9]{8})$").expect("phone pattern is valid")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

pub fn validate_phone(phone: &str) -> bool {
    !phone.is_empty()
        && phone.bytes().all(|b| b.is_ascii_digit())
        && PHONE_PATTERN.is_match(phone)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email) && email.len() <= 254
}

/// Checks every field of the booking dialog. The first problem found is
/// reported; nothing is sent when this fails.
#[instrument(skip(form))]
pub fn validate_booking_form(form: &BookingForm) -> Result<(), AppointmentError> {
    let required = [
        ("patient name", &form.patient_name),
        ("email", &form.email),
        ("address", &form.address),
        ("reason", &form.reason),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            debug!("Booking form missing {}", field);
            return Err(AppointmentError::ValidationError(format!("{} is required", field)));
        }
    }

    if !validate_phone(form.phone.trim()) {
        return Err(AppointmentError::ValidationError("invalid phone number".to_string()));
    }

    if !validate_email(form.email.trim()) {
        return Err(AppointmentError::ValidationError("invalid email address".to_string()));
    }

    Ok(())
}
