use super::{handlers, state::AppState};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
///
/// Static routes win over the catch-all client route.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/teste", get(handlers::teste))
        .route("/clients", get(handlers::clients_handler))
        .route("/{route}", get(handlers::generate_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
