//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the full service: an unauthenticated health check
//! and the report routes behind the bearer-token middleware.

pub mod error;
pub mod middleware;
pub mod reports;

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use error::ErrorResponse;
pub use middleware::{auth_middleware, AuthRejection, AuthState, RequireReportAdmin};
pub use reports::{report_routes, ReportsAppState};

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Build the application router.
///
/// # Routes
/// - `GET /health` - unauthenticated
/// - `/api/reports/*` - see [`report_routes`]
pub fn app_router(state: ReportsAppState, validator: AuthState, request_timeout: Duration) -> Router {
    let reports = report_routes()
        .route_layer(axum::middleware::from_fn_with_state(validator, auth_middleware))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/reports", reports)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
