//! Blog HTTP Server Binary
//!
//! This is the main entry point for the blog REST API server.
//! It opens the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run against ./blog.db (created on first start)
//! cargo run --bin blog-server
//!
//! # Run with the in-memory repository
//! REPOSITORY_TYPE=local cargo run --bin blog-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `sqlite` or `local` (default: sqlite, or the value in `blog.toml`)
//! - `DATABASE_PATH`: SQLite file (default: blog.db, or the value in `blog.toml`)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blog_backend::db::{RepositoryConfig, RepositoryFactory};
use blog_backend::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting blog HTTP server");

    let config = RepositoryConfig::load()?;
    info!(
        repository = %config.repository.repo_type,
        database = %config.sqlite.database_path,
        "Configuration loaded"
    );

    let repository = RepositoryFactory::from_repository_config(&config).await?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
