use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use tracing::{debug, warn};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{AvailabilityLoad, AvailabilityView, DoctorSchedule, TimeSlot};

/// Identifies one availability request. Only the most recently issued
/// ticket may write its result into view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub doctor_id: i64,
    pub date: NaiveDate,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Monotonic counter behind [`FetchTicket`].
#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: u64,
}

impl RequestGenerations {
    pub fn issue(&mut self, doctor_id: i64, date: NaiveDate) -> FetchTicket {
        self.latest += 1;
        FetchTicket { generation: self.latest, doctor_id, date }
    }

    pub fn is_latest(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.latest
    }
}

/// Midnight UTC of `date`, the instant the backend keys bookings by.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `2026-10-19T00:00:00.000Z`
pub fn booking_date_param(date: NaiveDate) -> String {
    utc_midnight(date).format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub struct AvailabilityService {
    api: ApiClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    /// Raw doctor-day schedule, errors included.
    pub async fn get_doctor_schedule(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<TimeSlot>, AppError> {
        debug!("Fetching schedule for doctor {} on {}", doctor_id, date);

        let query = [
            ("doctorId", doctor_id.to_string()),
            ("bookingDate", booking_date_param(date)),
        ];

        let schedule: DoctorSchedule = self.api
            .request_enveloped::<DoctorSchedule, ()>(Method::GET, "/api/bookings/doctor", &query, auth_token, None)
            .await?;

        if let Some(returned) = schedule.doctor_id.filter(|id| *id != doctor_id) {
            return Err(AppError::Decode(format!(
                "schedule for doctor {} returned for doctor {}",
                returned, doctor_id
            )));
        }

        Ok(dedup_slots(schedule.booking_time_info_dtos))
    }

    /// Slots of one doctor-day seen through `view`. Failures come back as an
    /// empty load with the reason attached.
    pub async fn fetch_availability(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        view: AvailabilityView,
        auth_token: Option<&str>,
    ) -> AvailabilityLoad {
        match self.get_doctor_schedule(doctor_id, date, auth_token).await {
            Ok(slots) => {
                let slots = view.apply(slots);
                debug!("Doctor {} has {} {:?} slots on {}", doctor_id, slots.len(), view, date);
                AvailabilityLoad::ready(slots)
            }
            Err(e) => {
                warn!("Availability for doctor {} on {} unavailable: {}", doctor_id, date, e);
                AvailabilityLoad::failed(e.to_string())
            }
        }
    }

    /// Same as [`AvailabilityService::fetch_availability`] for the doctor-day
    /// named by `ticket`.
    pub async fn load(
        &self,
        ticket: &FetchTicket,
        view: AvailabilityView,
        auth_token: Option<&str>,
    ) -> AvailabilityLoad {
        self.fetch_availability(ticket.doctor_id, ticket.date, view, auth_token).await
    }
}

/// Slot ids are unique per doctor-day; later duplicates are dropped.
fn dedup_slots(slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    let mut seen = HashSet::with_capacity(slots.len());
    let total = slots.len();

    let unique: Vec<TimeSlot> = slots.into_iter().filter(|slot| seen.insert(slot.id)).collect();
    if unique.len() != total {
        warn!("Dropped {} duplicate slot ids from schedule", total - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_date_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(booking_date_param(date), "2026-01-05T00:00:00.000Z");
        assert_eq!(utc_midnight(date).date_naive(), date);
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut generations = RequestGenerations::default();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let first = generations.issue(1, day);
        let second = generations.issue(1, day.succ_opt().unwrap());

        assert!(!generations.is_latest(&first));
        assert!(generations.is_latest(&second));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn duplicate_slot_ids_are_dropped() {
        let slot = |id: i64, from: &str| TimeSlot {
            id,
            from_time: from.to_string(),
            to_time: "x".to_string(),
            price: None,
            booked: false,
        };

        let unique = dedup_slots(vec![slot(1, "08:00"), slot(2, "09:00"), slot(1, "10:00")]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].from_time, "08:00");
    }
}
