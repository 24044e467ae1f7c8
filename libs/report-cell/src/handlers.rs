use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ApiStatus, AppointmentsSummary, DashboardMetrics, ReportError};
use crate::services::export::ExportService;
use crate::services::summary::ReportService;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn map_error(e: ReportError) -> AppError {
    match e {
        ReportError::DatabaseError(msg) => AppError::Database(msg),
        ReportError::ExportError(msg) => AppError::Internal(msg),
    }
}

fn reports(state: &AppConfig) -> ReportService {
    ReportService::new(Arc::new(StoreClient::new(state)))
}

pub async fn appointments_summary(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<AppointmentsSummary>, AppError> {
    let summary = reports(&state)
        .appointments_summary(query.start_date, query.end_date, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(summary))
}

pub async fn dashboard_metrics(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<DashboardMetrics>, AppError> {
    let metrics = reports(&state)
        .dashboard_metrics(auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(metrics))
}

pub async fn api_status(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiStatus>, AppError> {
    let username = user.username.as_deref().unwrap_or(&user.id).to_string();
    let status = reports(&state)
        .api_status(&username, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(status))
}

pub async fn export_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = ExportService::new(Arc::new(StoreClient::new(&state)));
    let bytes = service
        .export_appointments_csv(query.start_date, query.end_date, auth.token())
        .await
        .map_err(map_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"appointments_export.csv\"",
            ),
        ],
        bytes,
    ))
}
