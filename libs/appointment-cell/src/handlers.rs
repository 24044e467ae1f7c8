use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, BookAppointmentRequest,
    CalendarWeekResponse, StatusUpdateRequest, UpdateAppointmentRequest,
};
use crate::services::booking::BookingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ByDateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ByPetQuery {
    pub pet_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CalendarWeekQuery {
    pub date: Option<NaiveDate>,
}

fn map_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::ProfessionalDoubleBooked { .. } => AppError::Conflict(e.to_string()),
        AppointmentError::StaleSchedule(_)
        | AppointmentError::OutsideBusinessHours { .. }
        | AppointmentError::MissingMedicationInfo { .. }
        | AppointmentError::InvalidStatus(_)
        | AppointmentError::CannotDeleteCompleted => AppError::BadRequest(e.to_string()),
        AppointmentError::NotFound
        | AppointmentError::PetNotFound
        | AppointmentError::ServiceNotFound
        | AppointmentError::ProfessionalNotFound => AppError::NotFound(e.to_string()),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let created_by = Uuid::parse_str(&user.id).ok();

    let service = BookingService::new(&state);
    let appointment = service
        .book(request, created_by, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointment))
}

pub async fn search_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service
        .search(query, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service
        .get(appointment_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service
        .update(appointment_id, request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointment))
}

pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service
        .update_status(appointment_id, request, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    service
        .delete(appointment_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn get_appointments_by_date(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<ByDateQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service
        .list_by_date(query.date, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointments))
}

pub async fn get_appointments_by_pet(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<ByPetQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service
        .list_by_pet(query.pet_id, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(appointments))
}

pub async fn get_calendar_week(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<CalendarWeekQuery>,
) -> Result<Json<CalendarWeekResponse>, AppError> {
    let service = BookingService::new(&state);
    let week = service
        .calendar_week(query.date, auth.token())
        .await
        .map_err(map_error)?;
    Ok(Json(week))
}
