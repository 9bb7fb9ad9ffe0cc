use reqwest::Method;
use tracing::{debug, info, instrument};

use doctor_cell::Doctor;
use shared_api::ApiClient;
use shared_config::AppConfig;

use crate::models::{AppointmentError, BookingPrice, PriceDraft};

const BOOKING_PRICE_PATH: &str = "/api/booking-price";

/// A price needs a doctor, a slot template and a positive amount.
pub fn validate_price(draft: &PriceDraft) -> Result<(), AppointmentError> {
    if draft.doctor_id <= 0 {
        return Err(AppointmentError::ValidationError("choose a doctor".to_string()));
    }
    if draft.booking_time_id <= 0 {
        return Err(AppointmentError::ValidationError("choose a time slot".to_string()));
    }
    if !draft.price.is_finite() || draft.price <= 0.0 {
        return Err(AppointmentError::ValidationError(format!(
            "price must be a positive amount, got {}",
            draft.price
        )));
    }
    Ok(())
}

/// Groups prices under their doctor, keeping the order doctors first appear in.
pub fn group_by_doctor(prices: Vec<BookingPrice>) -> Vec<(Doctor, Vec<BookingPrice>)> {
    let mut groups: Vec<(Doctor, Vec<BookingPrice>)> = Vec::new();

    for price in prices {
        match groups.iter_mut().find(|(doctor, _)| doctor.id == price.doctor.id) {
            Some((_, entries)) => entries.push(price),
            None => groups.push((price.doctor.clone(), vec![price])),
        }
    }
    groups
}

/// Back-office maintenance of per-doctor slot prices.
pub struct BookingPriceService {
    api: ApiClient,
}

impl BookingPriceService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    /// The price list is served as a bare array.
    pub async fn list(&self, auth_token: &str) -> Result<Vec<BookingPrice>, AppointmentError> {
        debug!("Listing booking prices");

        let prices: Vec<BookingPrice> = self.api
            .request::<Vec<BookingPrice>, ()>(Method::GET, BOOKING_PRICE_PATH, &[], Some(auth_token), None)
            .await?;
        Ok(prices)
    }

    #[instrument(skip(self, auth_token))]
    pub async fn create(&self, draft: &PriceDraft, auth_token: &str) -> Result<(), AppointmentError> {
        validate_price(draft)?;

        self.api
            .execute(Method::POST, BOOKING_PRICE_PATH, Some(auth_token), Some(draft))
            .await?;

        info!("Priced slot {} for doctor {}", draft.booking_time_id, draft.doctor_id);
        Ok(())
    }

    #[instrument(skip(self, auth_token))]
    pub async fn update(&self, id: i64, draft: &PriceDraft, auth_token: &str) -> Result<(), AppointmentError> {
        validate_price(draft)?;

        let path = format!("{}/{}", BOOKING_PRICE_PATH, id);
        self.api
            .execute(Method::PUT, &path, Some(auth_token), Some(draft))
            .await?;

        info!("Updated booking price {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64, auth_token: &str) -> Result<(), AppointmentError> {
        let path = format!("{}/{}", BOOKING_PRICE_PATH, id);
        self.api
            .execute::<()>(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        info!("Deleted booking price {}", id);
        Ok(())
    }
}
