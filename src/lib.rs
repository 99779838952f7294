use std::error::Error;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::{routing::get, Router};

use dotenvy::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod errors;
mod handlers;
mod jobs;
mod logger;
mod models;
mod repositories;

pub use crate::config::Config;
pub use crate::repositories::telegram::TelegramClient;

/// Shared by every handler; built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub telegram: TelegramClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let telegram = TelegramClient::new(&config.telegram_base_url, config.timeout())?;

        Ok(AppState {
            config: Arc::new(config),
            telegram,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(handlers::hook::SECRET_HEADER),
        ]);

    Router::new()
        .route(
            "/hook",
            get(handlers::hook::ping).post(handlers::hook::receive),
        )
        .route("/", get(handlers::health::hello_world))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

pub async fn axum() -> Result<(), Box<dyn Error>> {
    logger::init();

    dotenv().ok();

    let config = Config::from_env()?;

    if config.bot_token().is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN is not set, every /hook request will fail");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config)?;

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await?;

    Ok(())
}
