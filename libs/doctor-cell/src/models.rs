use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub introduction: String,
    /// HTML produced by the back-office editor.
    #[serde(default)]
    pub long_introduction: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        if self.title.is_empty() {
            self.full_name.clone()
        } else {
            format!("{} {}", self.title, self.full_name)
        }
    }
}

/// A bookable interval on one doctor-day. `booked` is the backend's view at
/// fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: i64,
    pub from_time: String,
    pub to_time: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub booked: bool,
}

impl TimeSlot {
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.from_time, self.to_time)
    }

    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("{} VNĐ", format_vnd(price)),
            None => "-".to_string(),
        }
    }
}

/// Formats an amount with `.` thousands separators, e.g. `1.250.000`.
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Payload of `GET /api/bookings/doctor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSchedule {
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub booking_date: Option<String>,
    #[serde(rename = "bookingTimeInfoDTOS")]
    pub booking_time_info_dtos: Vec<TimeSlot>,
}

/// Which slots a screen wants to see from a doctor-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityView {
    /// Patient booking: only openings.
    Open,
    /// Back-office schedule: only existing appointments.
    Booked,
    /// Everything, booked slots included.
    All,
}

impl AvailabilityView {
    pub fn admits(&self, slot: &TimeSlot) -> bool {
        match self {
            AvailabilityView::Open => !slot.booked,
            AvailabilityView::Booked => slot.booked,
            AvailabilityView::All => true,
        }
    }

    pub fn apply(&self, slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
        slots.into_iter().filter(|slot| self.admits(slot)).collect()
    }
}

/// Result of one availability fetch. A failed fetch carries an empty list
/// and the reason, never an `Err`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityLoad {
    pub slots: Vec<TimeSlot>,
    pub error: Option<String>,
}

impl AvailabilityLoad {
    pub fn ready(slots: Vec<TimeSlot>) -> Self {
        Self { slots, error: None }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self { slots: Vec::new(), error: Some(reason.into()) }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
