//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account id of the token holder
    pub sub: String,
    /// Token purpose, e.g. "login"
    pub iss: String,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Issued-at, Unix seconds
    pub iat: i64,
}

/// Verified caller identity, attached to the request by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub issuer: String,
    pub expires_at: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}

/// Body of `POST /register` and `POST /login`
#[derive(Deserialize, Debug)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub username: String,
}

#[derive(Serialize, Debug)]
pub struct WhoamiResponse {
    pub user_id: String,
    pub issuer: String,
}
