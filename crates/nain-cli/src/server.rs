use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use nain_core::SiteConfig;
use nain_motion::{Gallery, GalleryTile};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::contact::{self, EnvLookup, MailerFactory};

/// Pages served from `<public_dir>/<page>/index.html` without a trailing slash.
const PAGES: [&str; 2] = ["work", "contact"];

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub gallery: Arc<Gallery>,
    pub env: EnvLookup,
    pub mailer: Arc<dyn MailerFactory>,
}

impl AppState {
    pub fn new(config: &SiteConfig, mailer: Arc<dyn MailerFactory>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            gallery: Arc::new(Gallery::new(config.work.clone())),
            env: Arc::new(|key: &str| std::env::var(key).ok()),
            mailer,
        }
    }
}

/// The site config in the JSON shape `SequencePlayer.mount` accepts.
async fn site_config(State(state): State<AppState>) -> Json<SiteConfig> {
    Json(state.config.as_ref().clone())
}

async fn work(State(state): State<AppState>) -> Json<Vec<GalleryTile>> {
    Json(state.gallery.tiles())
}

pub fn router(state: AppState, public_dir: &Path) -> Router {
    let mut app = Router::new()
        .route("/api/contact", post(contact::handle_contact))
        .route("/api/config", get(site_config))
        .route("/api/work", get(work));
    for page in PAGES {
        app = app.route_service(
            &format!("/{}", page),
            ServeFile::new(public_dir.join(page).join("index.html")),
        );
    }
    app
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: SiteConfig,
    bind: SocketAddr,
    public_dir: PathBuf,
    mailer: Arc<dyn MailerFactory>,
) -> Result<()> {
    if !public_dir.is_dir() {
        tracing::warn!(
            "public directory {} does not exist; only the API routes will respond",
            public_dir.display()
        );
    }

    let state = AppState::new(&config, mailer);
    let app = router(state, &public_dir);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    tracing::info!(
        "serving {} on http://{} ({} gallery items)",
        public_dir.display(),
        bind,
        config.work.len()
    );
    println!("🌐 NAIN site running at http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
