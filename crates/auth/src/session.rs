//! Session data for an authenticated House Keeper user.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the backend encodes into its access tokens.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    sub: Option<String>,
}

/// An authenticated session against the House Keeper API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// The bearer token presented on every authenticated request.
    pub access_token: String,
    pub token_type: String,
    /// Expiry instant recovered from the token's `exp` claim, when present.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Subject the token was issued for (the username).
    #[serde(default)]
    pub subject: Option<String>,
}

impl Session {
    /// Build a session from a bearer token, recovering expiry and subject from the
    /// token's claims. The signature is not checked; only the server holds the key,
    /// and the client treats the claims as display/bookkeeping data.
    pub fn from_access_token(access_token: &str, token_type: &str) -> Self {
        let claims = decode_claims(access_token);
        let expires_at = claims
            .as_ref()
            .and_then(|claims| claims.exp)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());
        let subject = claims.and_then(|claims| claims.sub);

        Self {
            access_token: access_token.to_string(),
            token_type: token_type.to_string(),
            expires_at,
            subject,
        }
    }

    /// Check whether the session's token has expired. Tokens without a readable
    /// `exp` claim are assumed live; the server rejects them with 401 if not.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}
