use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use owner_cell::router::owner_routes;
use pet_cell::router::pet_routes;
use professional_cell::router::professional_routes;
use report_cell::router::{report_routes, status_routes};
use service_cell::router::service_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Veterinary clinic API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/owners", owner_routes(state.clone()))
        .nest("/pets", pet_routes(state.clone()))
        .nest("/services", service_routes(state.clone()))
        .nest("/professionals", professional_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/status", status_routes(state))
}
