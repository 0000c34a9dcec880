//! Task module
//!
//! This module contains the task entity, the local cache store, and the
//! list view-model.

mod cache;
mod model;
mod view;

pub use cache::{CacheStore, FileCacheStore};
pub use model::*;
pub use view::{ListQuery, StatusFilter};
