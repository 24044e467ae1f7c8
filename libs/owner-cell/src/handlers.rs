use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use pet_cell::models::Pet;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{CreateOwnerRequest, Owner, OwnerError, UpdateOwnerRequest};
use crate::services::registry::OwnerRegistryService;

#[derive(Debug, Deserialize)]
pub struct IdentificationQuery {
    pub identification: String,
}

fn map_error(e: OwnerError) -> AppError {
    match e {
        OwnerError::NotFound => AppError::NotFound("Owner not found".to_string()),
        OwnerError::ValidationError(msg) => AppError::ValidationError(msg),
        OwnerError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn registry(state: &AppConfig) -> OwnerRegistryService {
    OwnerRegistryService::new(Arc::new(StoreClient::new(state)))
}

pub async fn create_owner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateOwnerRequest>,
) -> Result<Json<Owner>, AppError> {
    let owner = registry(&state)
        .create(request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(owner))
}

pub async fn list_owners(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Owner>>, AppError> {
    let owners = registry(&state)
        .list_active(auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(owners))
}

pub async fn get_owner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Owner>, AppError> {
    let owner = registry(&state)
        .get(owner_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(owner))
}

pub async fn update_owner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(owner_id): Path<Uuid>,
    Json(request): Json<UpdateOwnerRequest>,
) -> Result<Json<Owner>, AppError> {
    let owner = registry(&state)
        .update(owner_id, request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(owner))
}

pub async fn delete_owner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    registry(&state)
        .delete(owner_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn get_owner_pets(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = registry(&state)
        .pets(owner_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pets))
}

pub async fn search_by_identification(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<IdentificationQuery>,
) -> Result<Json<Owner>, AppError> {
    let owner = registry(&state)
        .find_by_identification(&query.identification, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(owner))
}
