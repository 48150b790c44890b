pub mod appresult;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod poll;
pub mod res;
pub mod store;

use axum::{extract::FromRef, http::HeaderValue, Router};
use serde::Serialize;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

pub use appresult::{AppError, AppResult};

use config::Config;
use identity::IdentityResolver;
use store::MessageStore;

#[derive(Debug, Clone, Serialize)]
pub struct ChatInfo {
    pub title: String,
}

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: MessageStore,
    pub identity: IdentityResolver,
    pub chat_info: ChatInfo,
}

impl AppState {
    pub fn new(config: &Config, store: MessageStore) -> Self {
        Self {
            store,
            identity: IdentityResolver::new(&config.jwt.secret, config.user.salt.clone()),
            chat_info: ChatInfo { title: config.chat.title.clone() },
        }
    }
}

/// The full service: routes, request tracing and, when an origin is configured, CORS.
pub fn app(state: AppState, cors_origin: Option<&str>) -> anyhow::Result<Router> {
    let mut app = handlers::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = cors_origin {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin.parse::<HeaderValue>()?)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    Ok(app)
}
