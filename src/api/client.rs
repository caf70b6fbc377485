use std::time::Duration;

use tracing::debug;

use super::error::ApiError;
use super::types::{Envelope, Joke, JokeItem, NameQuery};

pub const DEFAULT_API_BASE: &str = "https://api.icndb.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct JokeClient {
    http: reqwest::Client,
    base: String,
}

impl JokeClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetches the whole joke batch for a name pair. The API has no paging.
    pub async fn fetch_jokes(&self, name: &NameQuery) -> Result<Vec<Joke>, ApiError> {
        let url = format!("{}/jokes", self.base);
        let envelope: Envelope<Vec<JokeItem>> = self
            .http
            .get(&url)
            .query(&[("firstName", &name.first), ("lastName", &name.last)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = envelope.value.len(), name = %name.display(), "fetched jokes");
        Ok(envelope.value.into_iter().map(Joke::from_item).collect())
    }

    pub async fn fetch_categories(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/categories", self.base);
        let envelope: Envelope<Vec<String>> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(categories = ?envelope.value, "fetched categories");
        Ok(envelope.value)
    }
}
