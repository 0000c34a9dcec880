//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Task lifecycle status, with the wire names used by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In-Progress")]
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    /// Display ordering: Pending sorts ahead of In-Progress ahead of Completed.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "inprogress" | "in_progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(Error::Validation(format!("Invalid status: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In-Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task record as exchanged with the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Absent until persisted; server-assigned, or synthesized locally
    /// when created while the server is unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build an unpersisted task from a validated draft.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: None,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            created_at: None,
            updated_at: None,
        }
    }

    /// Build a locally persisted task for when the server cannot be
    /// reached: the id is synthesized from the current epoch millis and
    /// creation is stamped locally.
    pub fn local_from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Some(now.timestamp_millis()),
            created_at: Some(now),
            ..Self::from_draft(draft)
        }
    }

    /// Placeholder record shown when starting up without a reachable server.
    pub fn sample(now: DateTime<Utc>) -> Self {
        Self {
            id: Some(1),
            title: "Sample Task".to_string(),
            description: Some("This is a sample task (task server offline)".to_string()),
            status: TaskStatus::Pending,
            due_date: Some(now),
            created_at: Some(now),
            updated_at: None,
        }
    }
}

/// User-submitted task fields, prior to validation
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Create a draft with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            due_date: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Trim and check the draft before anything is sent.
    ///
    /// An empty title rejects the draft; a blank description collapses to
    /// absent.
    pub fn validate(mut self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Task title is required".to_string()));
        }
        self.title = title.to_string();
        self.description = self.description.and_then(|d| {
            let d = d.trim();
            (!d.is_empty()).then(|| d.to_string())
        });
        Ok(self)
    }
}

/// Partial update sent to the remote API; only provided fields change
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Trim and check the patch. A title patched to blank is rejected; a
    /// blank description is dropped from the patch.
    pub fn validate(mut self) -> Result<Self> {
        if let Some(title) = self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(Error::Validation("Task title is required".to_string()));
            }
            self.title = Some(title.to_string());
        }
        self.description = self.description.and_then(|d| {
            let d = d.trim();
            (!d.is_empty()).then(|| d.to_string())
        });
        Ok(self)
    }

    /// Merge into an existing task, leaving unset fields untouched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
    }
}
