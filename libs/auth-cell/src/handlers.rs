use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt;

use crate::models::{AuthError, LoginRequest, LoginResponse};
use crate::services::login::LoginService;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

fn map_error(e: AuthError) -> AppError {
    match e {
        AuthError::MissingCredentials => AppError::BadRequest(e.to_string()),
        AuthError::AccountLocked | AuthError::AccountLockedNow => AppError::Locked(e.to_string()),
        AuthError::InvalidCredentials { .. } => AppError::Auth(e.to_string()),
        AuthError::UserNotFound => AppError::Auth(e.to_string()),
        AuthError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = LoginService::new(&config);
    let response = service.login(request).await.map_err(map_error)?;
    Ok(Json(response))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.jwt_secret) {
        Ok(user) => {
            let response = TokenResponse {
                valid: true,
                user_id: user.id,
                username: user.username,
                role: user.role,
            };

            Ok(Json(response))
        }
        Err(err) => Err(AppError::Auth(err)),
    }
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.jwt_secret) {
        Ok(_) => Ok(Json(json!({ "valid": true }))),
        Err(_) => Ok(Json(json!({ "valid": false }))),
    }
}

pub async fn get_profile(Extension(user): Extension<User>) -> Result<Json<User>, AppError> {
    debug!("Getting profile for user: {}", user.id);
    Ok(Json(user))
}
