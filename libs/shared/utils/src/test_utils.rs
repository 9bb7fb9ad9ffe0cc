use chrono::{Duration, NaiveDate, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{User, ROLE_ADMIN};

pub struct TestConfig {
    pub api_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self { api_base_url: api_base_url.into() }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::with_base_url(self.api_base_url.clone())
    }
}

pub struct TestUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(username: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            full_name: format!("Nguyen Van {}", username),
            email: format!("{}@example.com", username),
            role: role.to_string(),
        }
    }

    pub fn patient(username: &str) -> Self {
        Self::new(username, "ROLE_USER")
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, ROLE_ADMIN)
    }

    pub fn to_user(&self) -> User {
        User {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: Some(self.role.clone()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.username,
            "role": user.role,
            "fullName": user.full_name,
            "email": user.email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn envelope(data: Value) -> Value {
        json!({
            "status": "OK",
            "message": "success",
            "data": data,
            "error_message": null
        })
    }

    pub fn failed_envelope(message: &str) -> Value {
        json!({
            "status": "BAD_REQUEST",
            "message": "failed",
            "data": null,
            "error_message": message
        })
    }

    pub fn doctor(doctor_id: i64) -> Value {
        json!({
            "id": doctor_id,
            "fullName": "Tran Thi B",
            "title": "ThS. BS",
            "major": "Tam than hoc",
            "introduction": "Bac si tam than",
            "longIntroduction": "<p>Hon 10 nam kinh nghiem</p>",
            "image": "https://cdn.example.com/doctor.png"
        })
    }

    pub fn time_slot(id: i64, from: &str, to: &str, booked: bool) -> Value {
        json!({
            "id": id,
            "fromTime": from,
            "toTime": to,
            "price": 300000,
            "booked": booked
        })
    }

    /// A day with two open and one booked slot.
    pub fn default_slots() -> Vec<Value> {
        vec![
            Self::time_slot(1, "08:00", "09:00", false),
            Self::time_slot(2, "09:00", "10:00", true),
            Self::time_slot(3, "10:00", "11:00", false),
        ]
    }

    pub fn doctor_schedule(doctor_id: i64, date: NaiveDate, slots: Vec<Value>) -> Value {
        Self::envelope(json!({
            "doctorId": doctor_id,
            "bookingDate": date.format("%Y-%m-%d").to_string(),
            "bookingTimeInfoDTOS": slots
        }))
    }

    pub fn question(id: i64, title: &str, points: &[i32]) -> Value {
        let answers: Vec<Value> = points
            .iter()
            .enumerate()
            .map(|(i, point)| json!({
                "id": id * 10 + i as i64,
                "answer": format!("Answer {}", i + 1),
                "point": point
            }))
            .collect();

        json!({
            "id": id,
            "questionTitle": title,
            "answers": answers
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "error": message
        })
    }
}
