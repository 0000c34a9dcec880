//! HTTP client for the remote task API
//!
//! Thin wrapper over reqwest. Every transport failure and every non-2xx
//! response is reported uniformly as a connectivity error; the service
//! layer decides how to fall back. One attempt per call, no retries.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::Result;

/// Client-side contract of the remote task API
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Probe reachability; any 2xx means the server is up.
    async fn health(&self) -> Result<()>;

    /// Fetch the full task collection.
    async fn list(&self) -> Result<Vec<Task>>;

    /// Create a task; the server assigns id and timestamps.
    async fn create(&self, draft: &TaskDraft) -> Result<Task>;

    /// Apply a partial update to the task with the given id.
    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task>;

    /// Delete the task with the given id.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// reqwest-backed implementation of [`TaskApi`]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn require_success(res: reqwest::Response) -> Result<reqwest::Response> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let error_text = res.text().await.unwrap_or_default();
        Err(Error::Connectivity(format!(
            "Server returned {}: {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn health(&self) -> Result<()> {
        let res = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| Error::Connectivity(format!("Failed to reach task server: {}", e)))?;

        Self::require_success(res).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Task>> {
        debug!("Fetching tasks from {}", self.base_url);

        let res = self
            .client
            .get(self.url("/tasks"))
            .send()
            .await
            .map_err(|e| Error::Connectivity(format!("Failed to fetch tasks: {}", e)))?;

        Self::require_success(res)
            .await?
            .json()
            .await
            .map_err(|e| Error::Connectivity(format!("Invalid task list response: {}", e)))
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        debug!("Creating task '{}'", draft.title);

        let res = self
            .client
            .post(self.url("/tasks"))
            .json(draft)
            .send()
            .await
            .map_err(|e| Error::Connectivity(format!("Failed to create task: {}", e)))?;

        Self::require_success(res)
            .await?
            .json()
            .await
            .map_err(|e| Error::Connectivity(format!("Invalid create response: {}", e)))
    }

    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        debug!("Updating task #{}", id);

        let res = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::Connectivity(format!("Failed to update task #{}: {}", id, e)))?;

        Self::require_success(res)
            .await?
            .json()
            .await
            .map_err(|e| Error::Connectivity(format!("Invalid update response: {}", e)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        debug!("Deleting task #{}", id);

        let res = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await
            .map_err(|e| Error::Connectivity(format!("Failed to delete task #{}: {}", id, e)))?;

        Self::require_success(res).await?;
        Ok(())
    }
}
