//! API router.
//!
//! Layers (outermost → innermost): CORS → access log → `Cache-Control: no-store`.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router with all endpoints under `/api/`.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/contracts/dispatch", post(endpoints::contracts::dispatch))
        .route("/orders", post(endpoints::orders::create))
        .route("/orders/:id", axum::routing::delete(endpoints::orders::delete))
        .route("/orders/:id/restore", post(endpoints::orders::restore))
        .route(
            "/orders/:id/contracts/:kind",
            get(endpoints::orders::contract_pdf),
        )
        .route(
            "/legal-templates/:kind",
            get(endpoints::legal_templates::get).put(endpoints::legal_templates::put),
        )
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", routes)
}
