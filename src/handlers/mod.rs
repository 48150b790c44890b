mod fetch;
mod post;
mod sync;

use axum::{routing::{get, put}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sync", put(sync::sync))
        .route("/", get(fetch::missing_watermark).post(post::post))
        .route("/{last}", get(fetch::fetch))
}
