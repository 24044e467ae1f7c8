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

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{CreatePetRequest, MedicalHistory, Pet, PetError, UpdatePetRequest};
use crate::services::registry::PetRegistryService;

#[derive(Debug, Deserialize)]
pub struct OwnerNameQuery {
    pub owner_name: String,
}

#[derive(Debug, Deserialize)]
pub struct BreedQuery {
    pub breed: String,
}

fn map_error(e: PetError) -> AppError {
    match e {
        PetError::NotFound => AppError::NotFound("Pet not found".to_string()),
        PetError::OwnerNotFound => AppError::BadRequest("Selected owner is not active".to_string()),
        PetError::ValidationError(msg) => AppError::ValidationError(msg),
        PetError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn registry(state: &AppConfig) -> PetRegistryService {
    PetRegistryService::new(Arc::new(StoreClient::new(state)))
}

pub async fn create_pet(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreatePetRequest>,
) -> Result<Json<Pet>, AppError> {
    let pet = registry(&state)
        .create(request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pet))
}

pub async fn list_pets(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = registry(&state)
        .list_active(auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pets))
}

pub async fn get_pet(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<Pet>, AppError> {
    let pet = registry(&state)
        .get(pet_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pet))
}

pub async fn update_pet(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(pet_id): Path<Uuid>,
    Json(request): Json<UpdatePetRequest>,
) -> Result<Json<Pet>, AppError> {
    let pet = registry(&state)
        .update(pet_id, request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pet))
}

pub async fn delete_pet(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    registry(&state)
        .delete(pet_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn find_pets_by_owner_name(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<OwnerNameQuery>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = registry(&state)
        .find_by_owner_name(&query.owner_name, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pets))
}

pub async fn find_pets_by_breed(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<BreedQuery>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = registry(&state)
        .find_by_breed(&query.breed, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(pets))
}

pub async fn get_medical_history(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<MedicalHistory>, AppError> {
    let history = registry(&state)
        .medical_history(pet_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(history))
}
