pub mod booking;
pub mod prices;
pub mod selection;
pub mod time_slots;
pub mod validation;
pub mod workflow;

pub use booking::BookingService;
pub use prices::{group_by_doctor, validate_price, BookingPriceService};
pub use selection::{SelectionState, SlotSelection};
pub use time_slots::{time_options, validate_range, SystemTimeSlotService};
pub use validation::{validate_booking_form, validate_email, validate_phone};
pub use workflow::BookingWorkflow;
