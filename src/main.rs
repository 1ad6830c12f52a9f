//! Song Library - a small HTTP service over a songs catalog.
//!
//! Exposes CRUD endpoints backed by PostgreSQL, a lyrics verse-pagination
//! endpoint, and enrichment of newly created songs from an external song
//! info service.

pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod lyrics;
pub mod model;
pub mod service;
#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::Config::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("song_library=info".parse().unwrap()))
        .init();

    let pool = db::init_db(&cfg.database_url()).await?;
    tracing::info!(host = %cfg.db_host, db = %cfg.db_name, "connected to database");

    let store = Arc::new(db::PgSongStore::new(pool));
    let state = http::AppState {
        service: service::SongService::new(store),
        song_info: Arc::new(enrichment::SongInfoClient::new(cfg.song_info_url.clone())),
    };

    http::serve(cfg.listen_addr(), state).await
}
