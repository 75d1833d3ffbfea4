use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::domain::{ParameterSave, SearchEntity};
use crate::schema::parse_datetime;

use super::join_url;

const SEARCH_PAGE_LEN: u32 = 6;

/// Gateway to the `api/hydra/*` surface: the persistent configuration tree.
#[derive(Debug, Clone)]
pub struct HydraApi {
    http: Client,
    base_url: String,
}

impl HydraApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Fetches the raw schema document for the whole menu tree.
    pub async fn fetch_tree(&self) -> Result<Value> {
        debug!("GET api/hydra/tree");
        self.http
            .get(self.url("api/hydra/tree"))
            .send()
            .await
            .context("tree request failed")?
            .error_for_status()
            .context("tree request rejected")?
            .json()
            .await
            .context("tree response was not valid JSON")
    }

    /// Fetches the raw schema fragment for one form.
    pub async fn fetch_node(&self, url: &str) -> Result<Value> {
        debug!("GET api/hydra/tree/{url}");
        self.http
            .get(self.url(&format!("api/hydra/tree/{url}")))
            .send()
            .await
            .with_context(|| format!("form request for '{url}' failed"))?
            .error_for_status()
            .with_context(|| format!("form request for '{url}' rejected"))?
            .json()
            .await
            .context("form response was not valid JSON")
    }

    /// Commits edited leaves as `{input_url, value, file_id}` triples.
    pub async fn set_values(&self, form_url: &str, items: &[ParameterSave]) -> Result<()> {
        debug!("POST api/hydra/elements/values ({} items)", items.len());
        self.http
            .post(self.url("api/hydra/elements/values"))
            .query(&[("name", form_url)])
            .json(items)
            .send()
            .await
            .context("value commit failed")?
            .error_for_status()
            .context("value commit rejected")?;
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchEntity>> {
        debug!("GET api/hydra/search q={query}");
        self.http
            .get(self.url("api/hydra/search"))
            .query(&[("q", query.to_string()), ("pagelen", SEARCH_PAGE_LEN.to_string())])
            .send()
            .await
            .context("search request failed")?
            .error_for_status()
            .context("search request rejected")?
            .json()
            .await
            .context("search response was not valid JSON")
    }

    /// Last modification time of the configuration files.
    pub async fn modify_time(&self) -> Result<NaiveDateTime> {
        debug!("GET api/hydra/modify");
        let raw: String = self
            .http
            .get(self.url("api/hydra/modify"))
            .send()
            .await
            .context("modify-time request failed")?
            .error_for_status()
            .context("modify-time request rejected")?
            .json()
            .await
            .context("modify-time response was not valid JSON")?;
        parse_datetime(&raw).with_context(|| format!("unparseable modify time '{raw}'"))
    }

    /// Reports the client's last-seen modification time so the backend can
    /// detect concurrent edits.
    pub async fn check_modify(&self, time: NaiveDateTime) -> Result<()> {
        let stamp = time.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        debug!("POST api/hydra/check/modify modify_time={stamp}");
        self.http
            .post(self.url("api/hydra/check/modify"))
            .query(&[("modify_time", stamp)])
            .send()
            .await
            .context("modify check failed")?
            .error_for_status()
            .context("modify check rejected")?;
        Ok(())
    }

    pub async fn reset_configuration(&self) -> Result<()> {
        debug!("POST api/hydra/configuration");
        self.http
            .post(self.url("api/hydra/configuration"))
            .send()
            .await
            .context("configuration reset failed")?
            .error_for_status()
            .context("configuration reset rejected")?;
        Ok(())
    }

    /// GET variant of the reset endpoint; returns the backend's status text.
    pub async fn reset_configuration_message(&self) -> Result<String> {
        debug!("GET api/hydra/reset/configuration");
        self.http
            .get(self.url("api/hydra/reset/configuration"))
            .send()
            .await
            .context("configuration reset failed")?
            .error_for_status()
            .context("configuration reset rejected")?
            .text()
            .await
            .context("configuration reset returned an unreadable body")
    }
}
