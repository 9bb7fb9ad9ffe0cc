use chrono::NaiveDate;
use tracing::debug;

use crate::models::{AvailabilityLoad, AvailabilityView, TimeSlot};
use crate::services::availability::{AvailabilityService, FetchTicket, RequestGenerations};

/// Date-keyed slot list for one doctor. Applying a load whose ticket is no
/// longer the latest is a no-op, so out-of-order responses never overwrite
/// a newer date.
#[derive(Debug)]
pub struct SlotBoard {
    doctor_id: i64,
    view: AvailabilityView,
    generations: RequestGenerations,
    date: Option<NaiveDate>,
    // None while the latest request is in flight
    slots: Option<Vec<TimeSlot>>,
    error: Option<String>,
}

impl SlotBoard {
    pub fn new(doctor_id: i64, view: AvailabilityView) -> Self {
        Self {
            doctor_id,
            view,
            generations: RequestGenerations::default(),
            date: None,
            slots: None,
            error: None,
        }
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    pub fn view(&self) -> AvailabilityView {
        self.view
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Switches to `date`, dropping whatever was shown before.
    pub fn select_date(&mut self, date: NaiveDate) -> FetchTicket {
        self.date = Some(date);
        self.slots = None;
        self.error = None;
        self.generations.issue(self.doctor_id, date)
    }

    /// Re-issues a request for the current date, keeping the shown slots
    /// until the answer lands.
    pub fn reload(&mut self) -> Option<FetchTicket> {
        let date = self.date?;
        Some(self.generations.issue(self.doctor_id, date))
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generations.is_latest(ticket)
            && ticket.doctor_id == self.doctor_id
            && Some(ticket.date) == self.date
    }

    /// Stores `load` if `ticket` is still current. Returns whether it was applied.
    pub fn apply(&mut self, ticket: &FetchTicket, load: AvailabilityLoad) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale availability for {} (generation {})",
                ticket.date,
                ticket.generation()
            );
            return false;
        }

        self.slots = Some(self.view.apply(load.slots));
        self.error = load.error;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.date.is_some() && self.slots.is_none()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        self.slots.as_deref().unwrap_or(&[])
    }

    pub fn slot(&self, slot_id: i64) -> Option<&TimeSlot> {
        self.slots().iter().find(|slot| slot.id == slot_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Flags a slot as taken right after a successful booking, ahead of the
    /// refreshed schedule.
    pub fn mark_booked(&mut self, slot_id: i64) -> bool {
        let Some(slots) = self.slots.as_mut() else {
            return false;
        };

        match slots.iter_mut().find(|slot| slot.id == slot_id) {
            Some(slot) => {
                slot.booked = true;
                let view = self.view;
                slots.retain(|slot| view.admits(slot));
                true
            }
            None => false,
        }
    }

    /// Selects `date`, fetches it and applies the result.
    pub async fn show_date(
        &mut self,
        date: NaiveDate,
        service: &AvailabilityService,
        auth_token: Option<&str>,
    ) -> bool {
        let ticket = self.select_date(date);
        let load = service.load(&ticket, self.view, auth_token).await;
        self.apply(&ticket, load)
    }
}
