use chrono::NaiveTime;
use reqwest::Method;
use tracing::{debug, info, instrument};

use shared_api::ApiClient;
use shared_config::AppConfig;

use crate::models::{AppointmentError, SystemTimeSlot};

const BOOKING_TIME_PATH: &str = "/api/booking-time";
const MINUTE_STEP: usize = 5;

fn parse_time(value: &str) -> Result<NaiveTime, AppointmentError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppointmentError::InvalidTime(format!("'{}' is not a HH:MM time", value)))
}

/// Both ends must parse and the slot must end after it starts.
pub fn validate_range(slot: &SystemTimeSlot) -> Result<(), AppointmentError> {
    let from = parse_time(&slot.from_time)?;
    let to = parse_time(&slot.to_time)?;

    if to <= from {
        return Err(AppointmentError::InvalidTime(format!(
            "end time {} must be after start time {}",
            slot.to_time, slot.from_time
        )));
    }
    Ok(())
}

/// Hour and minute choices offered by the time picker.
pub fn time_options() -> (Vec<String>, Vec<String>) {
    let hours = (0..24).map(|h| format!("{:02}", h)).collect();
    let minutes = (0..60).step_by(MINUTE_STEP).map(|m| format!("{:02}", m)).collect();
    (hours, minutes)
}

/// Back-office maintenance of the clinic-wide time slot templates.
pub struct SystemTimeSlotService {
    api: ApiClient,
}

impl SystemTimeSlotService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub async fn list(&self, auth_token: &str) -> Result<Vec<SystemTimeSlot>, AppointmentError> {
        debug!("Listing system time slots");

        let slots: Vec<SystemTimeSlot> = self.api
            .request_enveloped::<Vec<SystemTimeSlot>, ()>(Method::GET, BOOKING_TIME_PATH, &[], Some(auth_token), None)
            .await?;
        Ok(slots)
    }

    #[instrument(skip(self, auth_token))]
    pub async fn create(&self, slot: &SystemTimeSlot, auth_token: &str) -> Result<(), AppointmentError> {
        validate_range(slot)?;

        let body = SystemTimeSlot::new(slot.from_time.trim(), slot.to_time.trim());
        self.api
            .execute(Method::POST, BOOKING_TIME_PATH, Some(auth_token), Some(&body))
            .await?;

        info!("Created time slot {} - {}", body.from_time, body.to_time);
        Ok(())
    }

    #[instrument(skip(self, auth_token))]
    pub async fn update(&self, id: i64, slot: &SystemTimeSlot, auth_token: &str) -> Result<(), AppointmentError> {
        validate_range(slot)?;

        let body = SystemTimeSlot {
            id: Some(id),
            from_time: slot.from_time.trim().to_string(),
            to_time: slot.to_time.trim().to_string(),
        };
        let path = format!("{}/{}", BOOKING_TIME_PATH, id);
        self.api
            .execute(Method::PUT, &path, Some(auth_token), Some(&body))
            .await?;

        info!("Updated time slot {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64, auth_token: &str) -> Result<(), AppointmentError> {
        let path = format!("{}/{}", BOOKING_TIME_PATH, id);
        self.api
            .execute::<()>(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        info!("Deleted time slot {}", id);
        Ok(())
    }
}
