use chrono::NaiveDate;
use tracing::debug;

use doctor_cell::{AvailabilityLoad, AvailabilityView, FetchTicket, SlotBoard, TimeSlot};

use crate::models::AppointmentError;

/// Where the patient is in picking a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState<'a> {
    NoDateSelected,
    Loading { date: NaiveDate },
    Ready { date: NaiveDate, slots: &'a [TimeSlot] },
    SlotChosen { date: NaiveDate, slot: &'a TimeSlot },
}

/// Chosen date and slot for one doctor. Picking another date always drops
/// the chosen slot, so a slot can never be booked under a stale date.
#[derive(Debug)]
pub struct SlotSelection {
    board: SlotBoard,
    chosen: Option<TimeSlot>,
}

impl SlotSelection {
    pub fn new(doctor_id: i64) -> Self {
        Self {
            board: SlotBoard::new(doctor_id, AvailabilityView::Open),
            chosen: None,
        }
    }

    pub fn state(&self) -> SelectionState<'_> {
        match (self.board.date(), self.chosen.as_ref()) {
            (None, _) => SelectionState::NoDateSelected,
            (Some(date), Some(slot)) => SelectionState::SlotChosen { date, slot },
            (Some(date), None) if self.board.is_loading() => SelectionState::Loading { date },
            (Some(date), None) => SelectionState::Ready { date, slots: self.board.slots() },
        }
    }

    pub fn doctor_id(&self) -> i64 {
        self.board.doctor_id()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.board.date()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        self.board.slots()
    }

    pub fn is_loading(&self) -> bool {
        self.board.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.board.error()
    }

    pub fn chosen(&self) -> Option<&TimeSlot> {
        self.chosen.as_ref()
    }

    pub fn choose_date(&mut self, date: NaiveDate) -> FetchTicket {
        if let Some(slot) = self.chosen.take() {
            debug!("Date changed to {}, dropping chosen slot {}", date, slot.id);
        }
        self.board.select_date(date)
    }

    /// Applies a fetched slot list. Stale tickets are ignored. A chosen slot
    /// that is no longer offered is dropped.
    pub fn apply_slots(&mut self, ticket: &FetchTicket, load: AvailabilityLoad) -> bool {
        if !self.board.apply(ticket, load) {
            return false;
        }

        if let Some(chosen) = &self.chosen {
            if self.board.slot(chosen.id).is_none() {
                debug!("Chosen slot {} is no longer open", chosen.id);
                self.chosen = None;
            }
        }
        true
    }

    pub fn choose_slot(&mut self, slot_id: i64) -> Result<&TimeSlot, AppointmentError> {
        if self.board.date().is_none() {
            return Err(AppointmentError::NoDateSelected);
        }
        if self.board.is_loading() {
            return Err(AppointmentError::SlotsNotReady);
        }

        let slot = self.board
            .slot(slot_id)
            .ok_or(AppointmentError::SlotNotFound(slot_id))?;
        if slot.booked {
            return Err(AppointmentError::SlotNotAvailable);
        }

        Ok(self.chosen.insert(slot.clone()))
    }

    pub fn clear_slot(&mut self) {
        self.chosen = None;
    }

    /// Records a confirmed booking: the slot is flagged taken and the
    /// selection goes back to `Ready`.
    pub fn complete_booking(&mut self, slot_id: i64) {
        self.board.mark_booked(slot_id);
        self.chosen = None;
    }

    pub fn reload(&mut self) -> Option<FetchTicket> {
        self.board.reload()
    }
}
