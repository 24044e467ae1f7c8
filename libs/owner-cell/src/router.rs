use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn owner_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_owner))
        .route("/", get(handlers::list_owners))
        .route("/search-by-identification", get(handlers::search_by_identification))
        .route("/{owner_id}", get(handlers::get_owner))
        .route("/{owner_id}", put(handlers::update_owner))
        .route("/{owner_id}", delete(handlers::delete_owner))
        .route("/{owner_id}/pets", get(handlers::get_owner_pets))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
