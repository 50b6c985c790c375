//! git-rest - REST API over per-session git workspaces
//!
//! # Usage
//! ```bash
//! git-rest                           # Serve on 127.0.0.1:8080
//! git-rest --port 3000               # Pick a port
//! git-rest --workdir /srv/git-rest   # Where session workspaces live
//! ```
//!
//! Every request is bound to a session workspace via an opaque cookie
//! token; repositories live as directories inside that workspace, and all
//! git work is done by running the system `git` binary.

mod error;
mod git;
mod models;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git::WorkspaceManager;
use git::command::run_git;
use routes::AppState;

/// REST API over local git repositories
#[derive(Parser)]
#[command(name = "git-rest")]
#[command(about = "Version-control operations over HTTP", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to run the server on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Root directory holding session workspaces
    #[arg(short, long, default_value = "/tmp/git", value_name = "DIR")]
    workdir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The external tool must be runnable before we accept any request.
    let version = run_git(&["--version"], std::path::Path::new("."))
        .await
        .context("git binary is not runnable")?;
    tracing::info!(version = %version.stdout_text().trim(), "found git");

    let workspaces = WorkspaceManager::new(&cli.workdir);
    workspaces
        .ensure_root()
        .await
        .with_context(|| format!("failed to create workspace root {}", cli.workdir.display()))?;

    let state = Arc::new(AppState { workspaces });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, workdir = %cli.workdir.display(), "listening");

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
