use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use shared_models::auth::JwtClaims;

/// Reads the claims segment of a token issued by the backend. The
/// signature is not verified.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    // Some issuers keep the base64 padding, strip it before decoding.
    let claims_b64 = parts[1].trim_end_matches('=');

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(e) => {
            debug!("Failed to decode claims: {}", e);
            return Err("Invalid claims encoding".to_string());
        }
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    Ok(claims)
}

/// Expiry of the claims as a timestamp, if the token carries one.
pub fn expires_at(claims: &JwtClaims) -> Option<DateTime<Utc>> {
    claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}

pub fn is_expired(claims: &JwtClaims, now: DateTime<Utc>) -> bool {
    match expires_at(claims) {
        Some(exp) => exp <= now,
        None => false,
    }
}
