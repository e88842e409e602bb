//! House Keeper Rust Client Library
//!
//! A Rust client for the House Keeper household inventory API: accounts and
//! sessions, items, hierarchical storage locations (with client-side tree
//! construction), due-date reminders, dashboard statistics, and image uploads.
//!
//! The [`HouseKeeper`] struct wires one HTTP client, the client options, and a
//! shared [`SessionStore`] into per-service clients. Sign in once through
//! [`HouseKeeper::auth`]; every other client picks the session up from the store.

pub mod config;
pub mod error;
pub mod stats;

pub use house_keeper_auth as auth;
pub use house_keeper_items as items;
pub use house_keeper_locations as locations;
pub use house_keeper_reminders as reminders;
pub use house_keeper_storage as storage;

use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::stats::StatsClient;
use house_keeper_auth::{AuthClient, SessionStore};
use house_keeper_items::ItemsClient;
use house_keeper_locations::LocationsClient;
use house_keeper_reminders::RemindersClient;
use house_keeper_storage::StorageClient;
use log::debug;

/// Health report from `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// The main entry point for the House Keeper client.
pub struct HouseKeeper {
    /// Service root URL, without the API prefix
    pub url: String,
    /// HTTP client shared by every service client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    /// Session state shared by every service client
    pub session: SessionStore,
    auth: AuthClient,
}

impl HouseKeeper {
    /// Create a new client with default options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use house_keeper_rust::HouseKeeper;
    ///
    /// let client = HouseKeeper::new("http://localhost:8000").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use house_keeper_rust::{config::ClientOptions, HouseKeeper};
    ///
    /// let options = ClientOptions::default().with_api_prefix("/api/v2");
    /// let client = HouseKeeper::new_with_options("http://localhost:8000", options).unwrap();
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self, Error> {
        let url = base_url.trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(Error::config("base URL must not be empty"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let session =
            SessionStore::new().with_clear_on_unauthorized(options.sign_out_on_unauthorized);
        let api_url = format!("{}{}", url, options.api_prefix);
        let auth = AuthClient::new(&api_url, http_client.clone(), session.clone());

        Ok(Self {
            url,
            http_client,
            options,
            session,
            auth,
        })
    }

    /// Create a client from the `HOUSE_KEEPER_URL` environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var("HOUSE_KEEPER_URL")
            .map_err(|_| Error::config("HOUSE_KEEPER_URL environment variable not found"))?;
        Self::new(&url)
    }

    fn api_url(&self) -> String {
        format!("{}{}", self.url, self.options.api_prefix)
    }

    /// The auth client for registration, login, and profile operations.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// A client for the item endpoints.
    pub fn items(&self) -> ItemsClient {
        ItemsClient::new(&self.api_url(), self.http_client.clone(), self.session.clone())
    }

    /// A client for the location endpoints and tree construction.
    pub fn locations(&self) -> LocationsClient {
        LocationsClient::new(&self.api_url(), self.http_client.clone(), self.session.clone())
    }

    /// A client for the reminder endpoints.
    pub fn reminders(&self) -> RemindersClient {
        RemindersClient::new(&self.api_url(), self.http_client.clone(), self.session.clone())
    }

    /// A client for the dashboard statistics endpoints.
    pub fn stats(&self) -> StatsClient {
        StatsClient::new(&self.api_url(), self.http_client.clone(), self.session.clone())
    }

    /// A client for image uploads.
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Probe the unauthenticated health endpoint.
    pub async fn health_check(&self) -> Result<HealthStatus, Error> {
        let url = format!("{}/health", self.api_url());
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = detail_from_body(&response.text().await.unwrap_or_default());
            return Err(Error::Api { status, detail });
        }

        let health: HealthStatus = response.json().await?;
        Ok(health)
    }
}

pub(crate) fn detail_from_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => text.to_string(),
        },
        Err(_) => text.to_string(),
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::HouseKeeper;
    pub use house_keeper_auth::{AuthStateChange, Session, SessionStore};
    pub use house_keeper_locations::{build_tree, find_ancestor_chain, find_node_name};
}
