//! Dashboard statistics from the `/stats` endpoints.

use house_keeper_auth::SessionStore;
use house_keeper_locations::LocationId;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::Error;

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardCounts {
    pub items: u64,
    pub locations: u64,
    pub due_reminders: u64,
    pub upcoming_reminders: u64,
}

/// How many items fall into one category.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub name: String,
    pub value: u64,
}

/// A location ranked by how many items it holds.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LocationStat {
    pub id: LocationId,
    pub name: String,
    pub count: u64,
}

/// The dashboard payload: counts, category distribution, and the locations
/// holding the most items.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub counts: DashboardCounts,
    #[serde(default)]
    pub category_distribution: Vec<CategoryCount>,
    #[serde(default)]
    pub location_stats: Vec<LocationStat>,
}

/// Client for the `/stats` endpoints.
pub struct StatsClient {
    url: String,
    http_client: Client,
    store: SessionStore,
}

impl StatsClient {
    /// Create a new stats client rooted at the API base URL.
    pub fn new(url: &str, http_client: Client, store: SessionStore) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            store,
        }
    }

    fn bearer(&self) -> Result<String, Error> {
        self.store.access_token().ok_or(Error::MissingSession)
    }

    /// Fetch the aggregated dashboard statistics.
    pub async fn dashboard(&self) -> Result<DashboardStats, Error> {
        let token = self.bearer()?;
        let url = format!("{}/stats/dashboard", self.url);
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

        let stats: DashboardStats = response.json().await?;
        Ok(stats)
    }

    /// The locations holding the most items, at most `limit` of them (the
    /// backend defaults to 5).
    pub async fn popular_locations(&self, limit: Option<u32>) -> Result<Vec<LocationStat>, Error> {
        let token = self.bearer()?;
        let url = format!("{}/stats/popular-locations", self.url);
        debug!("GET {}", url);

        let mut request = self.http_client.get(&url).bearer_auth(&token);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let stats: Vec<LocationStat> = response.json().await?;
        Ok(stats)
    }

    async fn api_error(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.store.invalidate();
            return Error::Unauthorized;
        }
        let detail = crate::detail_from_body(&response.text().await.unwrap_or_default());
        Error::Api { status, detail }
    }
}
