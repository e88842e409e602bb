//! House Keeper locations client.
//!
//! CRUD and hierarchy operations against the `/locations` endpoints, plus the
//! [`tree`] module that rebuilds the display forest from a flat location list.

pub mod tree;
mod types;

pub use tree::{build_tree, find_ancestor_chain, find_node_name, LocationTreeNode, NodeId};
pub use types::{Location, LocationId, LocationTree, LocationUpdate, NewLocation};

use house_keeper_auth::SessionStore;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationsError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The backend refused the operation, e.g. deleting a location that still
    /// holds items or sub-locations.
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Location name must not be empty")]
    EmptyName,

    #[error("Not signed in")]
    MissingSession,

    #[error("Session rejected by the backend")]
    Unauthorized,

    #[error("API error: {detail} (status {status})")]
    Api { status: StatusCode, detail: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Query parameters for listing locations.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub parent_id: Option<LocationId>,
}

impl LocationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn parent(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(parent_id) = self.parent_id {
            params.push(("parent_id", parent_id.to_string()));
        }
        params
    }
}

/// Client for the `/locations` endpoints.
pub struct LocationsClient {
    url: String,
    http_client: Client,
    store: SessionStore,
}

impl LocationsClient {
    /// Create a new locations client rooted at the API base URL.
    pub fn new(url: &str, http_client: Client, store: SessionStore) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            store,
        }
    }

    fn bearer(&self) -> Result<String, LocationsError> {
        self.store
            .access_token()
            .ok_or(LocationsError::MissingSession)
    }

    /// List locations, optionally windowed or filtered by parent.
    pub async fn list(&self, query: &LocationQuery) -> Result<Vec<Location>, LocationsError> {
        let token = self.bearer()?;
        let url = format!("{}/locations", self.url);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&query.to_params())
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let locations: Vec<Location> = response.json().await?;
        Ok(locations)
    }

    /// List the direct children of a location.
    pub async fn list_by_parent(
        &self,
        parent_id: LocationId,
    ) -> Result<Vec<Location>, LocationsError> {
        self.list(&LocationQuery::new().parent(parent_id)).await
    }

    /// Fetch the server-built location tree.
    pub async fn tree(&self) -> Result<Vec<LocationTree>, LocationsError> {
        let token = self.bearer()?;
        let url = format!("{}/locations/tree", self.url);
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

        let tree: Vec<LocationTree> = response.json().await?;
        Ok(tree)
    }

    /// Fetch a location by id.
    pub async fn get(&self, id: LocationId) -> Result<Location, LocationsError> {
        let token = self.bearer()?;
        let url = format!("{}/locations/{}", self.url, id);
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

        let location: Location = response.json().await?;
        Ok(location)
    }

    /// Create a location.
    pub async fn create(&self, new_location: &NewLocation) -> Result<Location, LocationsError> {
        if new_location.name.trim().is_empty() {
            return Err(LocationsError::EmptyName);
        }
        let token = self.bearer()?;
        let url = format!("{}/locations", self.url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(new_location)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let location: Location = response.json().await?;
        Ok(location)
    }

    /// Update a location.
    pub async fn update(
        &self,
        id: LocationId,
        update: &LocationUpdate,
    ) -> Result<Location, LocationsError> {
        let token = self.bearer()?;
        let url = format!("{}/locations/{}", self.url, id);
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

        let location: Location = response.json().await?;
        Ok(location)
    }

    /// Delete a location. The backend refuses when the location still holds
    /// items or sub-locations; that refusal surfaces as
    /// [`LocationsError::Rejected`].
    pub async fn delete(&self, id: LocationId) -> Result<Location, LocationsError> {
        let token = self.bearer()?;
        let url = format!("{}/locations/{}", self.url, id);
        debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let location: Location = response.json().await?;
        Ok(location)
    }

    async fn api_error(&self, response: reqwest::Response) -> LocationsError {
        let status = response.status();
        let detail = detail_from_body(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED => {
                self.store.invalidate();
                LocationsError::Unauthorized
            }
            StatusCode::FORBIDDEN => LocationsError::PermissionDenied(detail),
            StatusCode::NOT_FOUND => LocationsError::NotFound(detail),
            StatusCode::BAD_REQUEST => LocationsError::Rejected(detail),
            _ => LocationsError::Api { status, detail },
        }
    }
}

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
