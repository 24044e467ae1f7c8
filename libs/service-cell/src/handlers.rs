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

use crate::models::{CreateServiceRequest, Service, ServiceError, ServiceType, UpdateServiceRequest};
use crate::services::catalog::CatalogService;

#[derive(Debug, Deserialize)]
pub struct ByTypeQuery {
    pub r#type: ServiceType,
}

fn map_error(e: ServiceError) -> AppError {
    match e {
        ServiceError::NotFound => AppError::NotFound("Service not found".to_string()),
        ServiceError::ValidationError(msg) => AppError::ValidationError(msg),
        ServiceError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn catalog(state: &AppConfig) -> CatalogService {
    CatalogService::new(Arc::new(StoreClient::new(state)))
}

pub async fn create_service(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let service = catalog(&state)
        .create(request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(service))
}

pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = catalog(&state)
        .list_active(auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    let service = catalog(&state)
        .get(service_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(service))
}

pub async fn update_service(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(service_id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let service = catalog(&state)
        .update(service_id, request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    catalog(&state)
        .delete(service_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn list_services_by_type(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<ByTypeQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = catalog(&state)
        .list_by_type(query.r#type, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(services))
}
