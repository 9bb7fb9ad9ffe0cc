use chrono::{Datelike, Duration, Local, NaiveDate};

use shared_config::DateWindowMode;

pub const WINDOW_DAYS: usize = 7;

/// The seven dates a booking screen offers, in order.
pub fn date_window(today: NaiveDate, mode: DateWindowMode) -> [NaiveDate; WINDOW_DAYS] {
    let start = match mode {
        DateWindowMode::Week => {
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
        }
        DateWindowMode::Rolling => today,
    };

    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
