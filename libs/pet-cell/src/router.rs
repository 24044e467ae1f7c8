use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn pet_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_pet))
        .route("/", get(handlers::list_pets))
        .route("/by-owner-name", get(handlers::find_pets_by_owner_name))
        .route("/by-breed", get(handlers::find_pets_by_breed))
        .route("/{pet_id}", get(handlers::get_pet))
        .route("/{pet_id}", put(handlers::update_pet))
        .route("/{pet_id}", delete(handlers::delete_pet))
        .route("/{pet_id}/medical-history", get(handlers::get_medical_history))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
