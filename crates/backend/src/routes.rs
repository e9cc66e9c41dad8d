use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::system;

/// Configure all application routes.
///
/// The public tree (the served storefront/console assets and any unmatched
/// path) sits behind the maintenance gate. System routes are mounted outside
/// the gate so the console stays reachable while maintenance is active.
pub fn configure_routes() -> Router {
    // Everything the public reaches goes through the maintenance gate.
    let public = Router::new()
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(
            system::maintenance::gate::maintenance_gate,
        ));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM MAINTENANCE ROUTES (ADMIN ONLY)
        // ========================================
        .route(
            "/api/system/maintenance",
            get(system::handlers::maintenance::get_config)
                .post(system::handlers::maintenance::save_config)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/maintenance/status",
            get(system::handlers::maintenance::status)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/maintenance/preview",
            post(system::handlers::maintenance::preview)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .merge(public)
}
