//! Signed developer tokens.
//!
//! WeatherKit authenticates every request with a short-lived JWT signed with
//! the team's ES256 private key. Besides the standard `kid`, the header must
//! carry an `id` of the form `"{team_id}.{service_id}"`, which the stock
//! `jsonwebtoken::Header` cannot express, so the signing input is assembled
//! here and only the signature is delegated to `jsonwebtoken`.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::Serialize;
use tracing::info;

use crate::config::Credentials;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct TokenHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    kid: &'a str,
    id: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
    sub: &'a str,
}

/// A signed token and the instant (seconds since epoch) it stops being valid.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    token: String,
    expiry_time: i64,
}

impl Token {
    /// Issues a token valid for `credentials.validity_secs` from now.
    pub fn issue(credentials: &Credentials) -> Result<Self> {
        Self::issue_at(credentials, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `issued_time`.
    pub fn issue_at(credentials: &Credentials, issued_time: i64) -> Result<Self> {
        let pem = std::fs::read(&credentials.key_path).map_err(|source| Error::Credential {
            path: credentials.key_path.clone(),
            source,
        })?;
        let key = EncodingKey::from_ec_pem(&pem)?;

        let expiry_time = issued_time + credentials.validity_secs;
        let header = TokenHeader {
            alg: "ES256",
            typ: "JWT",
            kid: &credentials.key_id,
            id: format!("{}.{}", credentials.team_id, credentials.service_id),
        };
        let claims = Claims {
            iss: &credentials.team_id,
            iat: issued_time,
            exp: expiry_time,
            sub: &credentials.service_id,
        };

        let message = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
        let signature = jsonwebtoken::crypto::sign(message.as_bytes(), &key, Algorithm::ES256)?;

        info!(
            kid = %credentials.key_id,
            expiry_time,
            "issued WeatherKit token"
        );

        Ok(Token {
            token: format!("{message}.{signature}"),
            expiry_time,
        })
    }

    /// Wraps an already signed token.
    pub fn from_parts(token: impl Into<String>, expiry_time: i64) -> Self {
        Token {
            token: token.into(),
            expiry_time,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expiry_time(&self) -> i64 {
        self.expiry_time
    }

    /// A token is unusable from its expiry second onwards.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expiry_time
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("expiry_time", &self.expiry_time)
            .finish()
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(jsonwebtoken::errors::Error::from)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
