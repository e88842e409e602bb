//! House Keeper items client.
//!
//! CRUD and filtered listing against the `/items` endpoints. List filters mirror
//! the backend's query parameters: pagination, single or multiple categories,
//! location, and name search.

mod types;

pub use types::{Item, ItemUpdate, NewItem};

use house_keeper_auth::SessionStore;
use house_keeper_locations::LocationId;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItemsError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

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

/// Query parameters for listing items.
///
/// Multiple categories are sent as one comma-joined `categories` parameter, the
/// form the backend splits server-side. When both are set, `categories` wins over
/// the single `category` filter, matching the backend's precedence.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub categories: Vec<String>,
    pub location_id: Option<LocationId>,
    pub search: Option<String>,
}

impl ItemQuery {
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

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
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
        if !self.categories.is_empty() {
            params.push(("categories", self.categories.join(",")));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(location_id) = self.location_id {
            params.push(("location_id", location_id.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

/// Client for the `/items` endpoints.
pub struct ItemsClient {
    url: String,
    http_client: Client,
    store: SessionStore,
}

impl ItemsClient {
    /// Create a new items client rooted at the API base URL.
    pub fn new(url: &str, http_client: Client, store: SessionStore) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            store,
        }
    }

    fn bearer(&self) -> Result<String, ItemsError> {
        self.store.access_token().ok_or(ItemsError::MissingSession)
    }

    /// List items matching the query.
    pub async fn list(&self, query: &ItemQuery) -> Result<Vec<Item>, ItemsError> {
        let token = self.bearer()?;
        let url = format!("{}/items", self.url);
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

        let items: Vec<Item> = response.json().await?;
        Ok(items)
    }

    /// List items in one category.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Item>, ItemsError> {
        self.list(&ItemQuery::new().category(category)).await
    }

    /// List items stored at a location.
    pub async fn by_location(&self, location_id: LocationId) -> Result<Vec<Item>, ItemsError> {
        self.list(&ItemQuery::new().location(location_id)).await
    }

    /// Search items by name.
    pub async fn search(&self, term: &str) -> Result<Vec<Item>, ItemsError> {
        self.list(&ItemQuery::new().search(term)).await
    }

    /// Fetch an item by id.
    pub async fn get(&self, id: i64) -> Result<Item, ItemsError> {
        let token = self.bearer()?;
        let url = format!("{}/items/{}", self.url, id);
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

        let item: Item = response.json().await?;
        Ok(item)
    }

    /// Create an item.
    pub async fn create(&self, new_item: &NewItem) -> Result<Item, ItemsError> {
        let token = self.bearer()?;
        let url = format!("{}/items", self.url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(new_item)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let item: Item = response.json().await?;
        Ok(item)
    }

    /// Update an item.
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> Result<Item, ItemsError> {
        let token = self.bearer()?;
        let url = format!("{}/items/{}", self.url, id);
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

        let item: Item = response.json().await?;
        Ok(item)
    }

    /// Delete an item. Returns the deleted record, as the backend does.
    pub async fn delete(&self, id: i64) -> Result<Item, ItemsError> {
        let token = self.bearer()?;
        let url = format!("{}/items/{}", self.url, id);
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

        let item: Item = response.json().await?;
        Ok(item)
    }

    async fn api_error(&self, response: reqwest::Response) -> ItemsError {
        let status = response.status();
        let detail = detail_from_body(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED => {
                self.store.invalidate();
                ItemsError::Unauthorized
            }
            StatusCode::FORBIDDEN => ItemsError::PermissionDenied(detail),
            StatusCode::NOT_FOUND => ItemsError::NotFound(detail),
            _ => ItemsError::Api { status, detail },
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_category_filters_join_with_commas() {
        let query = ItemQuery::new().categories(["Food", "Tools"]).skip(10);

        let params = query.to_params();

        assert!(params.contains(&("categories", "Food,Tools".to_string())));
        assert!(params.contains(&("skip", "10".to_string())));
    }

    #[test]
    fn empty_query_sends_no_parameters() {
        assert!(ItemQuery::new().to_params().is_empty());
    }
}
