use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claims the clinic backend puts in its access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }
}

impl From<JwtClaims> for User {
    fn from(claims: JwtClaims) -> Self {
        Self {
            username: claims.sub,
            full_name: claims.full_name.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
            role: claims.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignInRequest {
    #[serde(rename = "userName")]
    pub username: String,
    pub password: String,
}
