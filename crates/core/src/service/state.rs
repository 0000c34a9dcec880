//! Task list state and its transition reducer
//!
//! State changes are expressed as events applied by a pure function, so
//! every success and fallback path is testable without a server or a
//! filesystem. Timestamps travel inside the events to keep the reducer
//! deterministic.

use chrono::{DateTime, Utc};

use crate::task::{Task, TaskPatch};

/// Shared list state: the task sequence plus the two UI signals
#[derive(Debug, Clone, Default)]
pub struct TaskListState {
    /// Insertion-ordered task list, newest first
    pub tasks: Vec<Task>,
    /// True while a remote call is in flight
    pub loading: bool,
    /// Message of the most recent remote failure, cleared on success
    pub error: Option<String>,
}

/// Outcome of one remote round-trip, as seen by the state
#[derive(Debug, Clone)]
pub enum StateEvent {
    FetchSucceeded(Vec<Task>),
    FetchFailed {
        /// Cache contents to fall back to; `None` leaves the list untouched
        cached: Option<Vec<Task>>,
        message: String,
    },
    CreateSucceeded(Task),
    CreateFallback {
        task: Task,
        message: String,
    },
    UpdateSucceeded(Task),
    UpdateFallback {
        id: i64,
        patch: TaskPatch,
        updated_at: DateTime<Utc>,
        message: String,
    },
    DeleteSucceeded(i64),
    DeleteFallback {
        id: i64,
        message: String,
    },
}

/// Apply one event to the state, returning the next state.
pub fn apply(mut state: TaskListState, event: StateEvent) -> TaskListState {
    match event {
        StateEvent::FetchSucceeded(tasks) => {
            state.tasks = tasks;
            state.error = None;
        }
        StateEvent::FetchFailed { cached, message } => {
            if let Some(tasks) = cached {
                state.tasks = tasks;
            }
            state.error = Some(message);
        }
        StateEvent::CreateSucceeded(task) => {
            state.tasks.insert(0, task);
            state.error = None;
        }
        StateEvent::CreateFallback { task, message } => {
            state.tasks.insert(0, task);
            state.error = Some(message);
        }
        StateEvent::UpdateSucceeded(task) => {
            if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task;
            }
            state.error = None;
        }
        StateEvent::UpdateFallback {
            id,
            patch,
            updated_at,
            message,
        } => {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == Some(id)) {
                patch.apply_to(task);
                task.updated_at = Some(updated_at);
            }
            state.error = Some(message);
        }
        StateEvent::DeleteSucceeded(id) => {
            state.tasks.retain(|t| t.id != Some(id));
            state.error = None;
        }
        StateEvent::DeleteFallback { id, message } => {
            state.tasks.retain(|t| t.id != Some(id));
            state.error = Some(message);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskDraft, TaskStatus};

    fn persisted(id: i64, title: &str) -> Task {
        let mut task = Task::from_draft(TaskDraft::new(title));
        task.id = Some(id);
        task
    }

    fn state_with(tasks: Vec<Task>) -> TaskListState {
        TaskListState {
            tasks,
            loading: false,
            error: Some("stale failure".to_string()),
        }
    }

    #[test]
    fn test_fetch_succeeded_replaces_list_and_clears_error() {
        let state = state_with(vec![persisted(1, "old")]);
        let next = apply(
            state,
            StateEvent::FetchSucceeded(vec![persisted(2, "fresh"), persisted(3, "also fresh")]),
        );

        assert_eq!(next.tasks.len(), 2);
        assert_eq!(next.tasks[0].id, Some(2));
        assert!(next.error.is_none());
    }

    #[test]
    fn test_fetch_failed_falls_back_to_cache() {
        let state = TaskListState::default();
        let next = apply(
            state,
            StateEvent::FetchFailed {
                cached: Some(vec![persisted(7, "cached")]),
                message: "offline".to_string(),
            },
        );

        assert_eq!(next.tasks.len(), 1);
        assert_eq!(next.tasks[0].title, "cached");
        assert_eq!(next.error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_fetch_failed_without_cache_keeps_list() {
        let state = state_with(vec![persisted(1, "keep me")]);
        let next = apply(
            state,
            StateEvent::FetchFailed {
                cached: None,
                message: "offline".to_string(),
            },
        );

        assert_eq!(next.tasks.len(), 1);
        assert_eq!(next.tasks[0].title, "keep me");
        assert!(next.error.is_some());
    }

    #[test]
    fn test_create_prepends() {
        let state = state_with(vec![persisted(1, "existing")]);
        let next = apply(state, StateEvent::CreateSucceeded(persisted(2, "new")));

        assert_eq!(next.tasks[0].id, Some(2));
        assert_eq!(next.tasks[1].id, Some(1));
        assert!(next.error.is_none());
    }

    #[test]
    fn test_create_fallback_prepends_and_records_error() {
        let next = apply(
            TaskListState::default(),
            StateEvent::CreateFallback {
                task: persisted(99, "offline task"),
                message: "could not create".to_string(),
            },
        );

        assert_eq!(next.tasks.len(), 1);
        assert_eq!(next.error.as_deref(), Some("could not create"));
    }

    #[test]
    fn test_update_succeeded_replaces_matching_task() {
        let state = state_with(vec![persisted(1, "a"), persisted(2, "b")]);
        let mut updated = persisted(2, "b renamed");
        updated.status = TaskStatus::Completed;

        let next = apply(state, StateEvent::UpdateSucceeded(updated));

        assert_eq!(next.tasks[1].title, "b renamed");
        assert_eq!(next.tasks[1].status, TaskStatus::Completed);
        assert_eq!(next.tasks[0].title, "a");
        assert!(next.error.is_none());
    }

    #[test]
    fn test_update_fallback_merges_patch_and_stamps() {
        let now = Utc::now();
        let state = state_with(vec![persisted(5, "before")]);

        let next = apply(
            state,
            StateEvent::UpdateFallback {
                id: 5,
                patch: TaskPatch::new().with_title("after"),
                updated_at: now,
                message: "offline".to_string(),
            },
        );

        assert_eq!(next.tasks[0].title, "after");
        assert_eq!(next.tasks[0].updated_at, Some(now));
        assert_eq!(next.error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_update_fallback_unknown_id_is_noop_on_list() {
        let state = state_with(vec![persisted(1, "only")]);
        let next = apply(
            state,
            StateEvent::UpdateFallback {
                id: 42,
                patch: TaskPatch::new().with_title("ignored"),
                updated_at: Utc::now(),
                message: "offline".to_string(),
            },
        );

        assert_eq!(next.tasks.len(), 1);
        assert_eq!(next.tasks[0].title, "only");
        assert!(next.error.is_some());
    }

    #[test]
    fn test_delete_removes_by_id() {
        let state = state_with(vec![persisted(1, "a"), persisted(2, "b")]);
        let next = apply(state, StateEvent::DeleteSucceeded(1));

        assert_eq!(next.tasks.len(), 1);
        assert_eq!(next.tasks[0].id, Some(2));
        assert!(next.error.is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let state = state_with(vec![persisted(1, "a")]);
        let next = apply(
            state,
            StateEvent::DeleteFallback {
                id: 42,
                message: "offline".to_string(),
            },
        );

        assert_eq!(next.tasks.len(), 1);
        assert!(next.error.is_some());
    }
}
