use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::error::{MigrateError, Result};
use crate::model::{SourceProject, SourceTask};
use crate::source::TaskSource;

pub const DEFAULT_API_BASE_URL: &str = "https://api.todoist.com/rest/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the task service's REST API. The task listing only
/// returns open tasks.
pub struct RestClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(MigrateError::MissingToken);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tdsp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MigrateError::SourceFetch {
                resource: "client",
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    fn list<T: DeserializeOwned>(&self, resource: &'static str) -> Result<Vec<T>> {
        let url = self.endpoint(resource);
        tracing::debug!(%url, "requesting");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| MigrateError::SourceFetch {
                resource,
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(MigrateError::SourceStatus {
                resource,
                status: resp.status().as_u16(),
            });
        }

        resp.json().map_err(|e| MigrateError::SourceFetch {
            resource,
            message: format!("unexpected response body: {e}"),
        })
    }
}

impl TaskSource for RestClient {
    fn projects(&self) -> Result<Vec<SourceProject>> {
        self.list("projects")
    }

    fn tasks(&self) -> Result<Vec<SourceTask>> {
        self.list("tasks")
    }
}
