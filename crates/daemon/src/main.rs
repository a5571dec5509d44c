// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! truetrackd: HTTP API plus one background ingest worker.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tt_adapters::{
    FfmpegTagger, FfmpegTranscoder, ItunesArtFetcher, ItunesClient, YtDlpDownloader,
    YtDlpSearchProvider,
};
use tt_core::SystemClock;
use tt_daemon::app::{router, AppState};
use tt_daemon::env;
use tt_engine::{standard_pipeline, PipelineDeps, WorkerRuntime};
use tt_storage::{JobStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(env::log_level()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let host = env::host();
    let port = env::port();
    let db_path = env::db_path()?;

    let store: Arc<dyn JobStore> =
        Arc::new(SqliteStore::open(&db_path).context("opening job store")?);
    let clock = Arc::new(SystemClock);

    let deps = PipelineDeps {
        identity: Arc::new(YtDlpSearchProvider),
        downloader: Arc::new(YtDlpDownloader),
        transcoder: Arc::new(FfmpegTranscoder),
        metadata: Arc::new(ItunesClient::new().context("building metadata client")?),
        art: Arc::new(ItunesArtFetcher::new().context("building art client")?),
        tagger: Arc::new(FfmpegTagger),
        store: store.clone(),
        clock: clock.clone(),
    };
    let pipeline = Arc::new(standard_pipeline(deps));

    let worker = WorkerRuntime::new(store.clone(), pipeline, clock.clone());
    worker.start();

    let origins = env::allowed_origins(&host, port);
    let app = router(AppState::new(store, clock), &origins);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    tracing::info!(%host, port, db = %db_path.display(), "truetrackd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    worker.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
