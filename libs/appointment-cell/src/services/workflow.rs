use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use auth_cell::Session;
use doctor_cell::{
    date_window, AvailabilityLoad, AvailabilityService, AvailabilityView, Doctor, FetchTicket,
    TimeSlot, WINDOW_DAYS,
};
use shared_config::AppConfig;
use shared_models::Notice;

use crate::models::{AppointmentError, BookingForm};
use crate::services::booking::BookingService;
use crate::services::selection::{SelectionState, SlotSelection};

/// One patient booking screen for one doctor: date strip, open slots,
/// booking dialog and the notices they raise.
pub struct BookingWorkflow {
    doctor: Doctor,
    dates: [NaiveDate; WINDOW_DAYS],
    selection: SlotSelection,
    availability: AvailabilityService,
    booking: BookingService,
    access_token: Option<String>,
    notice: Option<Notice>,
}

impl BookingWorkflow {
    pub fn new(config: &AppConfig, doctor: Doctor, today: NaiveDate) -> Self {
        let dates = date_window(today, config.date_window_mode);
        debug!("Booking window for doctor {}: {} .. {}", doctor.id, dates[0], dates[WINDOW_DAYS - 1]);

        Self {
            selection: SlotSelection::new(doctor.id),
            doctor,
            dates,
            availability: AvailabilityService::new(config),
            booking: BookingService::new(config),
            access_token: None,
            notice: None,
        }
    }

    /// Sends the session bearer with every slot fetch.
    pub fn with_session(mut self, session: &Session) -> Self {
        self.access_token = Some(session.bearer().to_string());
        self
    }

    pub fn doctor(&self) -> &Doctor {
        &self.doctor
    }

    pub fn dates(&self) -> &[NaiveDate; WINDOW_DAYS] {
        &self.dates
    }

    pub fn state(&self) -> SelectionState<'_> {
        self.selection.state()
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    /// Starts switching to `date` without waiting for the slots.
    pub fn begin_date_change(&mut self, date: NaiveDate) -> FetchTicket {
        self.selection.choose_date(date)
    }

    pub async fn fetch(&self, ticket: &FetchTicket) -> AvailabilityLoad {
        self.availability
            .load(ticket, AvailabilityView::Open, self.access_token.as_deref())
            .await
    }

    /// Applies slots fetched for `ticket`. A failed load raises an error
    /// notice but leaves an empty list to pick from.
    pub fn finish_load(&mut self, ticket: &FetchTicket, load: AvailabilityLoad) -> bool {
        let failure = load.error.clone();
        let applied = self.selection.apply_slots(ticket, load);

        if applied {
            if let Some(reason) = failure {
                self.notice = Some(Notice::error(format!("Could not load time slots: {}", reason)));
            }
        }
        applied
    }

    /// Selects `date` and loads its open slots.
    pub async fn select_date(&mut self, date: NaiveDate) -> bool {
        let ticket = self.begin_date_change(date);
        let load = self.fetch(&ticket).await;
        self.finish_load(&ticket, load)
    }

    /// Selects the slot and opens the booking dialog.
    pub fn choose_slot(&mut self, slot_id: i64) -> Result<&TimeSlot, AppointmentError> {
        self.selection.choose_slot(slot_id)
    }

    pub fn cancel_slot(&mut self) {
        self.selection.clear_slot();
    }

    /// Submits the booking dialog. On success the slot is flagged booked and
    /// the day is fetched again; on failure the selection is left untouched.
    pub async fn confirm(&mut self, form: &BookingForm, session: &Session) -> Result<(), AppointmentError> {
        self.access_token = Some(session.bearer().to_string());
        let result = self.submit_chosen(form, session).await;

        match &result {
            Ok(slot) => {
                self.notice = Some(Notice::success(format!(
                    "Booked {} with {}",
                    slot.time_range(),
                    self.doctor.display_name()
                )));
                self.selection.complete_booking(slot.id);
                self.refresh().await;
            }
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
            }
        }

        result.map(|_| ())
    }

    async fn submit_chosen(&self, form: &BookingForm, session: &Session) -> Result<TimeSlot, AppointmentError> {
        let date = self.selection.date().ok_or(AppointmentError::NoDateSelected)?;
        let slot = self.selection.chosen().cloned().ok_or(AppointmentError::NoSlotSelected)?;

        if session.is_expired(Utc::now()) {
            return Err(AppointmentError::Unauthorized);
        }

        self.booking
            .submit(self.doctor.id, &slot, date, form, session.bearer())
            .await?;
        Ok(slot)
    }

    async fn refresh(&mut self) {
        let Some(ticket) = self.selection.reload() else {
            return;
        };
        let load = self.fetch(&ticket).await;
        if self.selection.apply_slots(&ticket, load) {
            info!("Refreshed slots for doctor {} on {}", self.doctor.id, ticket.date);
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
