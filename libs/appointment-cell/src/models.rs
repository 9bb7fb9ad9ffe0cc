// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::Doctor;
use shared_models::AppError;

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
        }
    }
}

impl FromStr for Gender {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(AppointmentError::ValidationError(format!(
                "gender must be MALE or FEMALE, got '{}'",
                other
            ))),
        }
    }
}

/// What the patient types into the booking dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub patient_name: String,
    pub phone: String,
    pub email: String,
    pub gender: Gender,
    pub address: String,
    pub reason: String,
}

/// Body of `POST /api/bookings`, assembled only at submission time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub doctor_id: i64,
    pub booking_time_id: i64,
    pub booking_date: NaiveDate,
    pub patient_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone: String,
    pub email: String,
    pub gender: Gender,
    pub address: String,
    pub reason: String,
    pub booking_type: bool,
}

impl BookingDraft {
    pub fn new(doctor_id: i64, booking_time_id: i64, booking_date: NaiveDate, form: &BookingForm) -> Self {
        Self {
            doctor_id,
            booking_time_id,
            booking_date,
            patient_name: form.patient_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            gender: form.gender,
            address: form.address.trim().to_string(),
            reason: form.reason.trim().to_string(),
            booking_type: true,
        }
    }
}

// ==============================================================================
// SYSTEM TIME SLOT TEMPLATES
// ==============================================================================

/// Clinic-wide time slot template managed from the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub from_time: String,
    pub to_time: String,
}

impl SystemTimeSlot {
    pub fn new(from_time: impl Into<String>, to_time: impl Into<String>) -> Self {
        Self {
            id: None,
            from_time: from_time.into(),
            to_time: to_time.into(),
        }
    }
}

// ==============================================================================
// BOOKING PRICES
// ==============================================================================

/// Price a doctor charges for one time slot template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPrice {
    pub id: i64,
    pub price: f64,
    pub doctor: Doctor,
    pub booking_time: SystemTimeSlot,
}

/// Body of the price create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDraft {
    pub doctor_id: i64,
    pub booking_time_id: i64,
    pub price: f64,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Choose a date first")]
    NoDateSelected,

    #[error("Time slots are still loading")]
    SlotsNotReady,

    #[error("Choose a time slot first")]
    NoSlotSelected,

    #[error("Time slot {0} is not offered on this date")]
    SlotNotFound(i64),

    #[error("Appointment slot not available")]
    SlotNotAvailable,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Sign in to book an appointment")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    ExternalServiceError(#[source] AppError),
}

impl From<AppError> for AppointmentError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Auth(_) => AppointmentError::Unauthorized,
            AppError::Conflict(_) => AppointmentError::SlotNotAvailable,
            AppError::NotFound(msg) => AppointmentError::NotFound(msg),
            AppError::ValidationError(msg) => AppointmentError::ValidationError(msg),
            other => AppointmentError::ExternalServiceError(other),
        }
    }
}

impl AppointmentError {
    /// Errors raised before any request is sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppointmentError::NoDateSelected
                | AppointmentError::SlotsNotReady
                | AppointmentError::NoSlotSelected
                | AppointmentError::SlotNotFound(_)
                | AppointmentError::InvalidTime(_)
                | AppointmentError::ValidationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> BookingForm {
        BookingForm {
            patient_name: "  Pham Thi D ".to_string(),
            phone: "0912345678".to_string(),
            email: "d@example.com".to_string(),
            gender: Gender::Female,
            address: "Ha Noi".to_string(),
            reason: "Mat ngu".to_string(),
        }
    }

    #[test]
    fn draft_uses_backend_field_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        let draft = BookingDraft::new(3, 11, date, &form());

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "doctorId": 3,
                "bookingTimeId": 11,
                "bookingDate": "2026-10-21",
                "patientName": "Pham Thi D",
                "phoneNumber": "0912345678",
                "email": "d@example.com",
                "gender": "FEMALE",
                "address": "Ha Noi",
                "reason": "Mat ngu",
                "bookingType": true
            })
        );
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert!("OTHER".parse::<Gender>().is_err());
    }

    #[test]
    fn backend_errors_map_to_booking_errors() {
        assert!(matches!(
            AppointmentError::from(AppError::Auth("expired".into())),
            AppointmentError::Unauthorized
        ));
        assert!(matches!(
            AppointmentError::from(AppError::Conflict("taken".into())),
            AppointmentError::SlotNotAvailable
        ));
        assert!(!AppointmentError::from(AppError::Transport("down".into())).is_local());
        assert!(AppointmentError::NoSlotSelected.is_local());
    }

    #[test]
    fn time_slot_template_omits_missing_id() {
        let slot = SystemTimeSlot::new("08:00", "08:30");
        assert_eq!(
            serde_json::to_value(&slot).unwrap(),
            json!({"fromTime": "08:00", "toTime": "08:30"})
        );
    }

    #[test]
    fn booking_price_reads_nested_doctor_and_slot() {
        let price: BookingPrice = serde_json::from_value(json!({
            "id": 4,
            "price": 250000.0,
            "doctor": {"id": 8, "fullName": "Nguyen Van A", "title": "ThS.BS"},
            "bookingTime": {"id": 2, "fromTime": "09:00:00", "toTime": "10:00:00", "booked": false}
        }))
        .unwrap();

        assert_eq!(price.doctor.display_name(), "ThS.BS Nguyen Van A");
        assert_eq!(price.booking_time.id, Some(2));
        assert_eq!(price.booking_time.from_time, "09:00:00");
    }
}
