use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use client_core::GraphqlClient;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod pages;
mod views;

use app_state::AppState;
use config::load_settings;
use pages::{auth, dashboard, rooms, speakers, talks};

/// Photo limit plus room for the text fields of the speaker form.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "console.toml")]
    config: PathBuf,
    /// Overrides `bind_addr` from the file and environment.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    let event_offset = settings.event_offset()?;
    let client = GraphqlClient::new(
        &settings.graphql_url,
        &settings.file_upload_url,
        settings.request_timeout(),
    )?;
    let state = AppState {
        backends: Arc::new(client),
        event_offset,
        cookie_secure: settings.cookie_secure,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, graphql = %settings.graphql_url, "console listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(dashboard::show))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/create-user", get(auth::create_user_page).post(auth::create_user))
        .route("/logout", get(auth::logout))
        .route("/speakers", get(speakers::index))
        .route("/speakers/new", get(speakers::new_page).post(speakers::create))
        .route("/speakers/:id/edit", get(speakers::edit_page).post(speakers::update))
        .route("/speakers/:id/move-up", post(speakers::move_up))
        .route("/speakers/:id/move-down", post(speakers::move_down))
        .route("/speakers/:id/delete", post(speakers::delete))
        .route("/talks", get(talks::index))
        .route("/talks/new", get(talks::new_page).post(talks::create))
        .route("/talks/:id/edit", get(talks::edit_page).post(talks::update))
        .route("/talks/:id/delete", post(talks::delete))
        .route("/rooms", get(rooms::index))
        .route("/rooms/new", get(rooms::new_page).post(rooms::create))
        .route("/rooms/:id/edit", get(rooms::edit_page).post(rooms::update))
        .route("/rooms/:id/delete", post(rooms::delete))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
