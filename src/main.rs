use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod cli;
mod config;
mod corpus;
mod records;
mod search;
mod semantic;
mod store;
#[cfg(test)]
mod tests;
mod web;
use app::{SearchContext, SearchRequest};
use cli::Command;
use config::Config;
use records::Collection;
use store::SqliteStore;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load both snapshots and build the indexes. Any error aborts startup.
fn build_context(config: &Config) -> anyhow::Result<SearchContext> {
    let store = Arc::new(SqliteStore::new(&config.db_path));
    let embedder = semantic::load_embedder(
        &config.semantic_search.model,
        config.semantic_search.cache_dir.clone(),
    )
    .context("failed to load embedding model")?;

    SearchContext::initialize(store, embedder, config.thresholds())
        .with_context(|| format!("failed to build search indexes from {:?}", config.db_path))
}

fn main() -> anyhow::Result<()> {
    // .env values must be in the environment before clap reads it
    dotenvy::dotenv().ok();
    init_logging();

    let args = cli::Args::parse();
    let config = Config::from(args.config);
    config.validate()?;
    log::debug!("{config:?}");

    let ctx = build_context(&config)?;

    match args.command {
        Command::Serve {} => web::start_daemon(Arc::new(ctx), &config),

        Command::Search {
            collection,
            query,
            page,
            limit,
            threshold,
        } => {
            let request = SearchRequest::new(query, page, limit, threshold)?;
            let output = match Collection::from(collection) {
                Collection::Users => serde_json::to_string_pretty(&ctx.search_users(&request))?,
                Collection::Aliases => {
                    serde_json::to_string_pretty(&ctx.search_aliases(&request))?
                }
            };
            println!("{output}");
            Ok(())
        }
    }
}
