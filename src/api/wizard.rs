use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};

use crate::domain::{CommentItem, Condition, ParameterSave, Site, StepStatus, WizardState};

use super::join_url;

/// Gateway to the `api/wizard/*` surface: the step-by-step deployment flow.
#[derive(Debug, Clone)]
pub struct WizardApi {
    http: Client,
    base_url: String,
}

impl WizardApi {
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

    pub async fn fetch_tree(&self) -> Result<Value> {
        debug!("GET api/wizard/tree");
        self.http
            .get(self.url("api/wizard/tree"))
            .send()
            .await
            .context("wizard tree request failed")?
            .error_for_status()
            .context("wizard tree request rejected")?
            .json()
            .await
            .context("wizard tree response was not valid JSON")
    }

    /// Fetches one wizard form. The backend re-checks the node's visibility
    /// conditions against the submitted values and rejects the fetch when
    /// they no longer hold.
    pub async fn fetch_node(
        &self,
        url: &str,
        conditions: &[Condition],
        prev_form_values: Option<&Value>,
    ) -> Result<Value> {
        debug!("POST api/wizard/tree/{url}");
        let body = json!({
            "conditions": conditions,
            "prev_form_values": prev_form_values,
        });
        self.http
            .post(self.url(&format!("api/wizard/tree/{url}")))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("wizard form request for '{url}' failed"))?
            .error_for_status()
            .with_context(|| format!("wizard form request for '{url}' rejected"))?
            .json()
            .await
            .context("wizard form response was not valid JSON")
    }

    pub async fn set_values(&self, form_url: &str, items: &[ParameterSave]) -> Result<()> {
        debug!("POST api/wizard/elements/values ({} items)", items.len());
        self.http
            .post(self.url("api/wizard/elements/values"))
            .query(&[("name", form_url)])
            .json(items)
            .send()
            .await
            .context("wizard value commit failed")?
            .error_for_status()
            .context("wizard value commit rejected")?;
        Ok(())
    }

    /// Bootstraps the architecture skeleton for a named deployment.
    pub async fn init_arch(&self, name: &str) -> Result<()> {
        debug!("POST api/wizard/init_arch name={name}");
        self.http
            .post(self.url("api/wizard/init_arch"))
            .query(&[("name", name)])
            .send()
            .await
            .context("init-arch request failed")?
            .error_for_status()
            .context("init-arch request rejected")?;
        Ok(())
    }

    pub async fn deploy_site(&self, name: &str, step_number: u32) -> Result<()> {
        debug!("POST api/wizard/deploy name={name} step={step_number}");
        self.http
            .post(self.url("api/wizard/deploy"))
            .query(&[("name", name.to_string()), ("step_number", step_number.to_string())])
            .send()
            .await
            .context("deploy request failed")?
            .error_for_status()
            .context("deploy request rejected")?;
        Ok(())
    }

    /// Polls deployment progress for all sites.
    pub async fn check_deploy(&self) -> Result<Vec<Site>> {
        debug!("GET api/wizard/check-deploy");
        let response = self
            .http
            .get(self.url("api/wizard/check-deploy"))
            .send()
            .await
            .context("deploy poll failed")?
            .error_for_status()
            .context("deploy poll rejected")?;

        // Older backends answer with a bare progress label instead of a site
        // list; fold that into an unnamed single entry.
        let body = response
            .text()
            .await
            .context("deploy poll returned an unreadable body")?;
        match serde_json::from_str::<Vec<Site>>(&body) {
            Ok(sites) => Ok(sites),
            Err(_) => Ok(vec![Site {
                name: String::new(),
                status: StepStatus::from_label(body.trim_matches('"')),
                step_number: 0,
            }]),
        }
    }

    pub async fn wizard_state(&self) -> Result<WizardState> {
        debug!("GET api/wizard/wizard-state");
        self.http
            .get(self.url("api/wizard/wizard-state"))
            .send()
            .await
            .context("wizard-state request failed")?
            .error_for_status()
            .context("wizard-state request rejected")?
            .json()
            .await
            .context("wizard-state response was not valid JSON")
    }

    /// Submits the batched comment-out queue.
    pub async fn comment_out(&self, items: &[CommentItem]) -> Result<()> {
        debug!("POST api/wizard/comment-out ({} items)", items.len());
        self.http
            .post(self.url("api/wizard/comment-out"))
            .json(items)
            .send()
            .await
            .context("comment-out request failed")?
            .error_for_status()
            .context("comment-out request rejected")?;
        Ok(())
    }

    /// Asks the backend to re-evaluate a node's visibility conditions.
    pub async fn check_condition(&self, path: &str, conditions: &[Condition]) -> Result<()> {
        debug!("POST api/wizard/form/condition path={path}");
        self.http
            .post(self.url("api/wizard/form/condition"))
            .query(&[("path", path)])
            .json(conditions)
            .send()
            .await
            .context("condition check failed")?
            .error_for_status()
            .context("condition check rejected")?;
        Ok(())
    }
}
