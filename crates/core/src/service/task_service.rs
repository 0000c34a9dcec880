//! Remote-backed task operations with local fallback
//!
//! Every mutation is attempted against the remote API first; when the
//! server cannot be reached the same mutation lands in local state and
//! the cache instead, and the result reports where it landed. The cache
//! write happens after the state transition, non-atomically, as a full
//! overwrite of the task list.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

use crate::notify::{Notification, Notifier};
use crate::remote::TaskApi;
use crate::task::{CacheStore, Task, TaskDraft, TaskPatch};
use crate::{Error, Result};

use super::state::{apply, StateEvent, TaskListState};

/// How an operation landed: confirmed by the remote API, or applied only
/// to local state and cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Remote(T),
    LocalFallback(T),
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::LocalFallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Remote(value) | Self::LocalFallback(value) => value,
        }
    }
}

/// Task data-access service
///
/// Owns the shared list state and coordinates the remote API, the local
/// cache, and the notification channel. Operations are not reentrant-safe:
/// concurrent calls interleave on the shared list and the last write wins.
pub struct TaskService {
    api: Arc<dyn TaskApi>,
    cache: Arc<dyn CacheStore>,
    state: RwLock<TaskListState>,
    notifier: Notifier,
}

impl TaskService {
    pub fn new(api: Arc<dyn TaskApi>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            api,
            cache,
            state: RwLock::new(TaskListState::default()),
            notifier: Notifier::new(),
        }
    }

    /// Subscribe to user-facing notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Snapshot of the current list state.
    pub async fn state(&self) -> TaskListState {
        self.state.read().await.clone()
    }

    /// Probe the API and load the initial list.
    ///
    /// When the server is unreachable the state is seeded with a sample
    /// task so the first render is non-empty; the fetch that follows then
    /// falls back to the cache.
    pub async fn init(&self) -> Result<Outcome<Vec<Task>>> {
        if let Err(e) = self.api.health().await {
            warn!("Task server unreachable, starting from local state: {}", e);
            self.state.write().await.tasks = vec![Task::sample(Utc::now())];
        }
        self.fetch().await
    }

    /// Refresh the task list from the remote API, falling back to the
    /// local cache when the server cannot be reached.
    pub async fn fetch(&self) -> Result<Outcome<Vec<Task>>> {
        self.set_loading(true).await;
        let result = self.fetch_inner().await;
        self.set_loading(false).await;
        result
    }

    /// Create a task from a draft. Invalid drafts are rejected before any
    /// network traffic; an unreachable server downgrades to a local save
    /// with a synthesized id.
    pub async fn create(&self, draft: TaskDraft) -> Result<Outcome<Task>> {
        let draft = self.validated(draft.validate())?;

        self.set_loading(true).await;
        let result = self.create_inner(draft).await;
        self.set_loading(false).await;
        result
    }

    /// Apply a partial update to the task with the given id. An
    /// unreachable server downgrades to an in-place merge with a fresh
    /// `updated_at`.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<Outcome<Task>> {
        let patch = self.validated(patch.validate())?;

        self.set_loading(true).await;
        let result = self.update_inner(id, patch).await;
        self.set_loading(false).await;
        result
    }

    /// Delete a task. Removal applies locally even when the server cannot
    /// be reached; deleting an unknown id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<Outcome<()>> {
        self.set_loading(true).await;
        let result = self.delete_inner(id).await;
        self.set_loading(false).await;
        result
    }

    async fn fetch_inner(&self) -> Result<Outcome<Vec<Task>>> {
        match self.api.list().await {
            Ok(tasks) => {
                let tasks = self.transition(StateEvent::FetchSucceeded(tasks)).await;
                Ok(Outcome::Remote(tasks))
            }
            Err(e) => {
                warn!("Failed to fetch tasks: {}", e);
                self.notifier.send(Notification::error(
                    "Connection Error",
                    "Could not connect to the task server. Using local data for now.",
                ));

                let cached = self.cache.load().await;
                let tasks = self
                    .transition(StateEvent::FetchFailed {
                        cached,
                        message: "Failed to fetch tasks. Please try again.".to_string(),
                    })
                    .await;
                Ok(Outcome::LocalFallback(tasks))
            }
        }
    }

    async fn create_inner(&self, draft: TaskDraft) -> Result<Outcome<Task>> {
        match self.api.create(&draft).await {
            Ok(task) => {
                let tasks = self
                    .transition(StateEvent::CreateSucceeded(task.clone()))
                    .await;
                self.cache.save(&tasks).await?;
                Ok(Outcome::Remote(task))
            }
            Err(e) => {
                warn!("Failed to create task remotely: {}", e);

                let task = Task::local_from_draft(draft, Utc::now());
                let tasks = self
                    .transition(StateEvent::CreateFallback {
                        task: task.clone(),
                        message: "Failed to create task. Please try again.".to_string(),
                    })
                    .await;
                self.cache.save(&tasks).await?;
                self.notifier.send(Notification::info(
                    "Task Created Locally",
                    "Task was saved locally due to server connection issues.",
                ));
                Ok(Outcome::LocalFallback(task))
            }
        }
    }

    async fn update_inner(&self, id: i64, patch: TaskPatch) -> Result<Outcome<Task>> {
        match self.api.update(id, &patch).await {
            Ok(task) => {
                let tasks = self
                    .transition(StateEvent::UpdateSucceeded(task.clone()))
                    .await;
                self.cache.save(&tasks).await?;
                Ok(Outcome::Remote(task))
            }
            Err(e) => {
                warn!("Failed to update task #{} remotely: {}", id, e);

                let tasks = self
                    .transition(StateEvent::UpdateFallback {
                        id,
                        patch,
                        updated_at: Utc::now(),
                        message: format!("Failed to update task #{}. Please try again.", id),
                    })
                    .await;
                self.cache.save(&tasks).await?;
                self.notifier.send(Notification::info(
                    "Task Updated Locally",
                    "Task was updated locally due to server connection issues.",
                ));

                match tasks.into_iter().find(|t| t.id == Some(id)) {
                    Some(task) => Ok(Outcome::LocalFallback(task)),
                    None => Err(Error::TaskNotFound(id)),
                }
            }
        }
    }

    async fn delete_inner(&self, id: i64) -> Result<Outcome<()>> {
        match self.api.delete(id).await {
            Ok(()) => {
                let tasks = self.transition(StateEvent::DeleteSucceeded(id)).await;
                self.cache.save(&tasks).await?;
                Ok(Outcome::Remote(()))
            }
            Err(e) => {
                warn!("Failed to delete task #{} remotely: {}", id, e);

                let tasks = self
                    .transition(StateEvent::DeleteFallback {
                        id,
                        message: format!("Failed to delete task #{}. Please try again.", id),
                    })
                    .await;
                self.cache.save(&tasks).await?;
                self.notifier.send(Notification::info(
                    "Task Deleted Locally",
                    "Task was removed locally due to server connection issues.",
                ));
                Ok(Outcome::LocalFallback(()))
            }
        }
    }

    /// Run one state transition and return the updated task list.
    async fn transition(&self, event: StateEvent) -> Vec<Task> {
        let mut state = self.state.write().await;
        *state = apply(std::mem::take(&mut *state), event);
        state.tasks.clone()
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.loading = loading;
    }

    fn validated<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            self.notifier
                .send(Notification::error("Validation Error", e.to_string()));
            e
        })
    }
}
