use chrono::NaiveDate;
use reqwest::Method;
use tracing::{info, instrument, warn};

use doctor_cell::TimeSlot;
use shared_api::ApiClient;
use shared_config::AppConfig;

use crate::models::{AppointmentError, BookingDraft, BookingForm};
use crate::services::validation::validate_booking_form;

pub struct BookingService {
    api: ApiClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    /// Validates `form` and books `slot` for `doctor_id` on `date`.
    /// Nothing is sent when validation fails or the slot is already taken.
    #[instrument(skip(self, slot, form, auth_token), fields(slot_id = slot.id))]
    pub async fn submit(
        &self,
        doctor_id: i64,
        slot: &TimeSlot,
        date: NaiveDate,
        form: &BookingForm,
        auth_token: &str,
    ) -> Result<(), AppointmentError> {
        validate_booking_form(form)?;

        if slot.booked {
            warn!("Slot {} on {} is already booked", slot.id, date);
            return Err(AppointmentError::SlotNotAvailable);
        }

        let draft = BookingDraft::new(doctor_id, slot.id, date, form);

        self.api
            .execute(Method::POST, "/api/bookings", Some(auth_token), Some(&draft))
            .await
            .map_err(|e| {
                warn!("Booking for doctor {} failed: {}", doctor_id, e);
                AppointmentError::from(e)
            })?;

        info!("Booked slot {} ({}) with doctor {} on {}", slot.id, slot.time_range(), doctor_id, date);
        Ok(())
    }
}
