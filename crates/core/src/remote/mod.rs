//! Remote task API access
//!
//! This module provides the HTTP client for the remote task server.

mod client;

pub use client::{HttpTaskApi, TaskApi};
