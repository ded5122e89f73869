use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;

/// Wraps the API router with health check, CORS, request tracing and, in
/// production, the built client as fallback for every other path.
pub fn app(router: Router, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router);

    let app = if config.production {
        tracing::info!(dir = %config.static_dir.display(), "serving static assets");
        app.fallback_service(ServeDir::new(&config.static_dir))
    } else {
        app
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}
