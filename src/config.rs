//! Configuration options for the House Keeper client.

use std::time::Duration;

/// Configuration options for the House Keeper client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Path prefix of the versioned API, prepended to every endpoint.
    pub api_prefix: String,

    /// The request timeout applied to the shared HTTP client.
    pub request_timeout: Option<Duration>,

    /// Whether a 401 from any endpoint drops the session and broadcasts
    /// `SignedOut`.
    pub sign_out_on_unauthorized: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_prefix: "/api/v1".to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            sign_out_on_unauthorized: true,
        }
    }
}

impl ClientOptions {
    /// Set the API path prefix.
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether a 401 drops the session.
    pub fn with_sign_out_on_unauthorized(mut self, value: bool) -> Self {
        self.sign_out_on_unauthorized = value;
        self
    }
}
