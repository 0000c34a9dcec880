//! Task data-access service
//!
//! This module holds the shared list state, the reducer that drives its
//! transitions, and the service wrapping remote calls with
//! fallback-to-local-cache semantics.

mod state;
mod task_service;

pub use state::{apply, StateEvent, TaskListState};
pub use task_service::{Outcome, TaskService};
