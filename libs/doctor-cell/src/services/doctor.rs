use reqwest::Method;
use tracing::{debug, error};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::Doctor;

pub struct DoctorService {
    api: ApiClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    /// Fetch a doctor profile by id
    pub async fn get_doctor(
        &self,
        doctor_id: i64,
        auth_token: Option<&str>,
    ) -> Result<Doctor, AppError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let path = format!("/api/doctors/{}", doctor_id);
        let doctor: Doctor = self.api
            .request_enveloped::<Doctor, ()>(Method::GET, &path, &[], auth_token, None)
            .await
            .map_err(|e| {
                error!("Failed to load doctor {}: {}", doctor_id, e);
                e
            })?;

        if doctor.id != doctor_id {
            return Err(AppError::Decode(format!(
                "asked for doctor {} but received {}",
                doctor_id, doctor.id
            )));
        }

        Ok(doctor)
    }
}
