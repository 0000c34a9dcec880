//! TaskDeck command-line front end
//!
//! Thin presentation layer over the td-core task service: parse a
//! command, run it against the service, print the result.

mod cli;
mod commands;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use td_core::config::Config;
use td_core::remote::HttpTaskApi;
use td_core::service::TaskService;
use td_core::task::FileCacheStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Cli::parse();

    let config = Config::from_env();
    tracing::debug!("Using task server at {}", config.api_base_url);

    let api = Arc::new(HttpTaskApi::new(config.api_base_url.clone()));
    let cache = Arc::new(FileCacheStore::new(config.cache_path()));
    let service = TaskService::new(api, cache);

    commands::run(&service, args.command).await
}
