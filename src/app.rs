use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::routes::{health, ingest, vegetables};
use crate::state::AppState;

pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::<AppState>::new()
        .route("/", get(root))
        .nest("/api/health", health::router())
        .nest("/api/vegetables", vegetables::router())
        .nest("/api/scrape", ingest::router())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> &'static str {
    "Yasai prices backend is alive"
}
