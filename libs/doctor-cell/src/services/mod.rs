pub mod availability;
pub mod board;
pub mod calendar;
pub mod doctor;

pub use availability::{AvailabilityService, FetchTicket, RequestGenerations};
pub use board::SlotBoard;
pub use calendar::{date_window, today, WINDOW_DAYS};
pub use doctor::DoctorService;
