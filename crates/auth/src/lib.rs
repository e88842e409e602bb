//! House Keeper authentication client.
//!
//! Registration, login, and current-user operations against the `/auth` endpoints,
//! plus the session store shared with the other service clients. The backend issues
//! short-lived bearer tokens on login and keeps no token state of its own, so
//! signing out is a purely local transition.

mod session;
mod store;
mod types;

pub use session::Session;
pub use store::{AuthStateChange, AuthSubscription, SessionStore};
pub use types::{NewUser, TokenResponse, User, UserUpdate};

use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API error: {detail} (status {status})")]
    Api { status: StatusCode, detail: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not signed in")]
    MissingSession,

    #[error("Session rejected by the backend")]
    Unauthorized,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for the `/auth` endpoints.
pub struct AuthClient {
    url: String,
    http_client: Client,
    store: SessionStore,
}

impl AuthClient {
    /// Create a new auth client rooted at the API base URL (including the API
    /// prefix, e.g. `http://host/api/v1`).
    pub fn new(url: &str, http_client: Client, store: SessionStore) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            store,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth{}", self.url, path)
    }

    /// The session store this client writes to.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The current session, if one is held.
    pub fn session(&self) -> Option<Session> {
        self.store.get()
    }

    /// Whether a session is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Register a new account. Registration does not sign the account in; call
    /// [`AuthClient::login`] afterwards.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let url = self.auth_url("/register");
        debug!("POST {}", url);

        let response = self.http_client.post(&url).json(new_user).send().await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let user: User = response.json().await?;
        Ok(user)
    }

    /// Log in with username and password. The backend expects the OAuth2 password
    /// form, so credentials go out form-encoded rather than as JSON. On success the
    /// session is stored and subscribers observe `SignedIn`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let url = self.auth_url("/login");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(self.api_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        let session = Session::from_access_token(&token.access_token, &token.token_type);
        self.store.set(session.clone());

        Ok(session)
    }

    /// Fetch the profile of the signed-in user.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        let token = self.store.access_token().ok_or(AuthError::MissingSession)?;
        let url = self.auth_url("/me");
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let user: User = response.json().await?;
        Ok(user)
    }

    /// Update the signed-in user's profile. Subscribers observe `UserUpdated`.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, AuthError> {
        let token = self.store.access_token().ok_or(AuthError::MissingSession)?;
        let url = self.auth_url("/me");
        debug!("PUT {}", url);

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(&token)
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let user: User = response.json().await?;
        self.store.emit(AuthStateChange::UserUpdated);
        Ok(user)
    }

    /// Drop the local session. The backend keeps no token state, so no request is
    /// made; subscribers observe `SignedOut`.
    pub fn sign_out(&self) {
        self.store.clear();
    }

    async fn api_error(&self, response: reqwest::Response) -> AuthError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.store.invalidate();
            return AuthError::Unauthorized;
        }
        let detail = detail_from_body(&response.text().await.unwrap_or_default());
        AuthError::Api { status, detail }
    }
}

/// Pull the human-readable message out of a FastAPI-style `{"detail": ...}` error
/// body, falling back to the raw text.
fn detail_from_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => text.to_string(),
        },
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_from_body_handles_the_common_shapes() {
        assert_eq!(detail_from_body(r#"{"detail": "Item not found"}"#), "Item not found");
        assert_eq!(
            detail_from_body(r#"{"detail": [{"loc": ["body", "email"]}]}"#),
            r#"[{"loc":["body","email"]}]"#
        );
        assert_eq!(detail_from_body("plain text"), "plain text");
    }
}
