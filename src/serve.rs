//! HTTP host for the dashboard. Every request to `/` re-renders the page from
//! the process-wide dataset cache, so the CSV is fetched once per process.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, extract::State, http::StatusCode, response::Html, routing::get};
use log::{error, info};

use crate::{
    cli::ServeArgs,
    loader::{self, CsvSource},
    page,
    render::HtmlRenderer,
};

#[derive(Clone)]
pub struct AppState {
    source: Arc<CsvSource>,
    renderer: Arc<HtmlRenderer>,
}

impl AppState {
    pub fn new(source: CsvSource) -> Result<Self> {
        Ok(Self {
            source: Arc::new(source),
            renderer: Arc::new(HtmlRenderer::new()?),
        })
    }

    fn render(&self) -> Result<String> {
        let dataset = loader::load_data(self.source.as_ref())
            .with_context(|| format!("Loading payments from {}", self.source.location()))?;
        let page = page::render_dashboard(&dataset).context("Aggregating payments")?;
        Ok(self.renderer.render(&page)?)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .with_state(state)
}

pub fn execute(args: &ServeArgs) -> Result<()> {
    let source = args.source.to_source()?;
    let state = AppState::new(source)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Starting async runtime")?;
    runtime.block_on(serve(state, args.addr))
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Binding {addr}"))?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    // loading may block on file or network I/O
    let rendered = tokio::task::spawn_blocking(move || state.render())
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    rendered.map(Html).map_err(|err| {
        error!("Render failed: {err:#}");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
    })
}

async fn health() -> &'static str {
    "ok"
}
