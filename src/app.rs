use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::{
    api::{self, Sessions},
    config::Settings,
    services::{CredentialStore, UrlRegistry},
};

mod seed;

pub use seed::seed_demo_data;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub registry: Arc<UrlRegistry>,
    pub sessions: Sessions,
    /// Root of the static files served for unmatched routes
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(
        credentials: CredentialStore,
        registry: UrlRegistry,
        sessions: Sessions,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            registry: Arc::new(registry),
            sessions,
            public_dir: public_dir.into(),
        }
    }
}

pub fn build_app_state(config: &Settings) -> Result<AppState> {
    let hasher = config.hasher()?;

    let state = AppState::new(
        CredentialStore::new(hasher),
        UrlRegistry::new(),
        Sessions::new(config.session_ttl),
        &config.public_dir,
    );

    if config.seed_demo_data {
        seed_demo_data(&state).context("failed to seed demo data")?;
        tracing::info!(
            users = state.credentials.len(),
            urls = state.registry.len(),
            "seeded demo data"
        );
    }

    Ok(state)
}

/// Periodically drop expired sessions
#[tracing::instrument(name = "session_maintenance", skip_all)]
pub async fn maintenance(sessions: Sessions, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;

        let removed = sessions.purge_expired();
        if removed > 0 {
            tracing::info!(removed, live = sessions.len(), "purged expired sessions");
        }
    }
}

pub async fn run(config: Settings) -> Result<()> {
    let state = build_app_state(&config)?;
    let router = api::build_router(state.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("TinyApp listening on {addr}");

    tokio::task::spawn(maintenance(
        state.sessions.clone(),
        config.session_sweep_interval,
    ));

    axum::serve(listener, router).await?;

    Ok(())
}
