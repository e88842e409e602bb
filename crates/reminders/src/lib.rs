//! House Keeper reminders client.
//!
//! CRUD and due-date queries against the `/reminders` endpoints. The backend owns
//! the clock: "due" means past due and not completed, "upcoming" means due within
//! the next N days (7 by default), both server-evaluated.

mod types;

pub use types::{NewReminder, Reminder, ReminderUpdate, RepeatType};

use house_keeper_auth::SessionStore;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemindersError {
    #[error("Reminder not found: {0}")]
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

/// Query parameters for listing reminders.
#[derive(Debug, Clone, Default)]
pub struct ReminderQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub item_id: Option<i64>,
    pub due: bool,
    pub upcoming: bool,
    pub days: Option<u32>,
}

impl ReminderQuery {
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

    pub fn item(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }

    /// Only reminders already past due and not completed.
    pub fn due(mut self) -> Self {
        self.due = true;
        self
    }

    /// Only reminders coming due within `days` days.
    pub fn upcoming(mut self, days: u32) -> Self {
        self.upcoming = true;
        self.days = Some(days);
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
        if let Some(item_id) = self.item_id {
            params.push(("item_id", item_id.to_string()));
        }
        if self.due {
            params.push(("due", "true".to_string()));
        }
        if self.upcoming {
            params.push(("upcoming", "true".to_string()));
            if let Some(days) = self.days {
                params.push(("days", days.to_string()));
            }
        }
        params
    }
}

/// Client for the `/reminders` endpoints.
pub struct RemindersClient {
    url: String,
    http_client: Client,
    store: SessionStore,
}

impl RemindersClient {
    /// Create a new reminders client rooted at the API base URL.
    pub fn new(url: &str, http_client: Client, store: SessionStore) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            store,
        }
    }

    fn bearer(&self) -> Result<String, RemindersError> {
        self.store
            .access_token()
            .ok_or(RemindersError::MissingSession)
    }

    /// List reminders matching the query.
    pub async fn list(&self, query: &ReminderQuery) -> Result<Vec<Reminder>, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders", self.url);
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

        let reminders: Vec<Reminder> = response.json().await?;
        Ok(reminders)
    }

    /// Reminders already past due and not completed.
    pub async fn due(&self) -> Result<Vec<Reminder>, RemindersError> {
        self.list(&ReminderQuery::new().due()).await
    }

    /// Reminders coming due within `days` days.
    pub async fn upcoming(&self, days: u32) -> Result<Vec<Reminder>, RemindersError> {
        self.list(&ReminderQuery::new().upcoming(days)).await
    }

    /// Reminders tied to an item.
    pub async fn by_item(&self, item_id: i64) -> Result<Vec<Reminder>, RemindersError> {
        self.list(&ReminderQuery::new().item(item_id)).await
    }

    /// Fetch a reminder by id.
    pub async fn get(&self, id: i64) -> Result<Reminder, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders/{}", self.url, id);
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

        let reminder: Reminder = response.json().await?;
        Ok(reminder)
    }

    /// Create a reminder.
    pub async fn create(&self, new_reminder: &NewReminder) -> Result<Reminder, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders", self.url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(new_reminder)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let reminder: Reminder = response.json().await?;
        Ok(reminder)
    }

    /// Update a reminder.
    pub async fn update(
        &self,
        id: i64,
        update: &ReminderUpdate,
    ) -> Result<Reminder, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders/{}", self.url, id);
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

        let reminder: Reminder = response.json().await?;
        Ok(reminder)
    }

    /// Delete a reminder. Returns the deleted record, as the backend does.
    pub async fn delete(&self, id: i64) -> Result<Reminder, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders/{}", self.url, id);
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

        let reminder: Reminder = response.json().await?;
        Ok(reminder)
    }

    /// Mark a reminder completed.
    pub async fn complete(&self, id: i64) -> Result<Reminder, RemindersError> {
        let token = self.bearer()?;
        let url = format!("{}/reminders/{}/complete", self.url, id);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let reminder: Reminder = response.json().await?;
        Ok(reminder)
    }

    async fn api_error(&self, response: reqwest::Response) -> RemindersError {
        let status = response.status();
        let detail = detail_from_body(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED => {
                self.store.invalidate();
                RemindersError::Unauthorized
            }
            StatusCode::FORBIDDEN => RemindersError::PermissionDenied(detail),
            StatusCode::NOT_FOUND => RemindersError::NotFound(detail),
            _ => RemindersError::Api { status, detail },
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
