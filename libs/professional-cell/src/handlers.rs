use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{Professional, ProfessionalError};
use crate::services::roster::RosterService;

fn map_error(e: ProfessionalError) -> AppError {
    match e {
        ProfessionalError::NotFound => AppError::NotFound("Professional not found".to_string()),
        ProfessionalError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn list_professionals(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Professional>>, AppError> {
    let service = RosterService::new(Arc::new(StoreClient::new(&state)));
    let professionals = service.list_active(auth.token()).await.map_err(map_error)?;
    Ok(Json(professionals))
}

pub async fn get_professional(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(professional_id): Path<Uuid>,
) -> Result<Json<Professional>, AppError> {
    let service = RosterService::new(Arc::new(StoreClient::new(&state)));
    let professional = service
        .get(professional_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(professional))
}
