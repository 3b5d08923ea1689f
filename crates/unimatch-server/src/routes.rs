use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::ServerState;

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/recommend", post(handlers::predict::recommend))
        .route("/api/kb/stats", get(handlers::kb::stats))
        .route("/api/kb/universities", get(handlers::kb::universities))
        .route(
            "/api/kb/universities/{name}/majors",
            get(handlers::kb::university_majors),
        )
        .route("/api/kb/majors", get(handlers::kb::majors))
        .route("/api/kb/majors-full", get(handlers::kb::majors_full))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
