use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use professional_cell::models::Professional;
use service_cell::models::Service;
use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, BookAppointmentRequest,
    CalendarWeekResponse, ProfessionalRef, ScheduleCandidate, StatusUpdateRequest,
    UpdateAppointmentRequest,
};
use crate::services::conflict::ConflictService;
use crate::services::lifecycle::LifecycleService;
use crate::services::scheduling::SchedulingValidator;

pub struct BookingService {
    store: Arc<StoreClient>,
    conflict_service: ConflictService,
    validator: SchedulingValidator,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let store = Arc::new(StoreClient::new(config));
        let validator = SchedulingValidator::new();
        let conflict_service =
            ConflictService::new(Arc::clone(&store), validator.rules().buffer_before_minutes);

        Self {
            store,
            conflict_service,
            validator,
        }
    }

    /// Book a new appointment. The scheduling validator runs over the
    /// professional's surrounding appointments before anything is written.
    ///
    /// The check-then-insert pair is not serialized against concurrent
    /// bookings; the store's exclusion constraint is the backstop for that.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        created_by: Option<Uuid>,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for pet {} at {}",
            request.pet_id, request.scheduled_at
        );

        self.verify_pet_exists(request.pet_id, auth_token).await?;
        let service = self.get_service(request.service_id, auth_token).await?;
        let professional = match request.professional_id {
            Some(id) => Some(self.get_professional(id, auth_token).await?),
            None => None,
        };

        let candidate = ScheduleCandidate {
            scheduled_at: request.scheduled_at,
            duration_minutes: service.duration_minutes,
            professional: professional
                .as_ref()
                .map(|p| ProfessionalRef { id: p.id, name: p.name.clone() }),
            service_name: service.name.clone(),
            requires_medication: service.requires_medication,
            medication_type: request.medication_type.clone(),
            exclude_id: None,
        };

        let existing = self.potential_conflicts(&candidate, auth_token).await?;
        self.validator.validate(&candidate, &existing, Utc::now())?;

        let body = json!({
            "id": Uuid::new_v4(),
            "pet_id": request.pet_id,
            "service_id": request.service_id,
            "professional_id": request.professional_id,
            "scheduled_at": request.scheduled_at,
            "duration_minutes": service.duration_minutes,
            "reason": request.reason,
            "status": "pending",
            "medication_type": request.medication_type,
            "medication_dosage": request.medication_dosage,
            "instructions": request.instructions.or(service.default_instructions),
            "created_by": created_by,
        });

        let result: Vec<Appointment> = self
            .store
            .request(Method::POST, "/rest/v1/appointments", Some(auth_token), Some(body))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let appointment = result
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::DatabaseError("Store returned no row".to_string()))?;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    /// Edit an existing appointment. The merged result goes back through the
    /// full validator, excluding the appointment itself from conflicts.
    pub async fn update(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment {}", appointment_id);

        let current = self.get(appointment_id, auth_token).await?;

        let service_id = request.service_id.unwrap_or(current.service_id);
        let service = self.get_service(service_id, auth_token).await?;

        let professional_id = request.professional_id.or(current.professional_id);
        let professional = match professional_id {
            Some(id) => Some(self.get_professional(id, auth_token).await?),
            None => None,
        };

        let scheduled_at = request.scheduled_at.unwrap_or(current.scheduled_at);
        let medication_type = request
            .medication_type
            .clone()
            .or(current.medication_type.clone());

        let candidate = ScheduleCandidate {
            scheduled_at,
            duration_minutes: service.duration_minutes,
            professional: professional
                .as_ref()
                .map(|p| ProfessionalRef { id: p.id, name: p.name.clone() }),
            service_name: service.name.clone(),
            requires_medication: service.requires_medication,
            medication_type: medication_type.clone(),
            exclude_id: Some(appointment_id),
        };

        let existing = self.potential_conflicts(&candidate, auth_token).await?;
        self.validator.validate(&candidate, &existing, Utc::now())?;

        let mut patch = serde_json::Map::new();
        patch.insert("service_id".to_string(), json!(service_id));
        patch.insert("professional_id".to_string(), json!(professional_id));
        patch.insert("scheduled_at".to_string(), json!(scheduled_at));
        patch.insert("duration_minutes".to_string(), json!(service.duration_minutes));
        if let Some(reason) = request.reason {
            patch.insert("reason".to_string(), json!(reason));
        }
        if let Some(medication_type) = request.medication_type {
            patch.insert("medication_type".to_string(), json!(medication_type));
        }
        if let Some(medication_dosage) = request.medication_dosage {
            patch.insert("medication_dosage".to_string(), json!(medication_dosage));
        }
        if let Some(instructions) = request.instructions {
            patch.insert("instructions".to_string(), json!(instructions));
        }
        if let Some(observations) = request.observations {
            patch.insert("observations".to_string(), json!(observations));
        }

        self.patch_appointment(appointment_id, Value::Object(patch), auth_token)
            .await
    }

    /// Narrow status-only update. Completion fills the actual times once.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        request: StatusUpdateRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let new_status = LifecycleService::parse_status(&request.status)?;
        let current = self.get(appointment_id, auth_token).await?;

        let times = LifecycleService::completion_times(&current, new_status, Utc::now());

        let mut patch = serde_json::Map::new();
        patch.insert("status".to_string(), json!(new_status));
        if let Some(end) = times.actual_end_time {
            patch.insert("actual_end_time".to_string(), json!(end));
        }
        if let Some(start) = times.actual_start_time {
            patch.insert("actual_start_time".to_string(), json!(start));
        }

        info!(
            "Appointment {} status change {} -> {}",
            appointment_id, current.status, new_status
        );

        self.patch_appointment(appointment_id, Value::Object(patch), auth_token)
            .await
    }

    pub async fn delete(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<(), AppointmentError> {
        let current = self.get(appointment_id, auth_token).await?;
        LifecycleService::ensure_deletable(current.status)?;

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        self.store
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    pub async fn get(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);

        let result: Vec<Appointment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    pub async fn search(
        &self,
        query: AppointmentSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut query_parts = Vec::new();

        if let Some(pet_id) = query.pet_id {
            query_parts.push(format!("pet_id=eq.{}", pet_id));
        }
        if let Some(service_id) = query.service_id {
            query_parts.push(format!("service_id=eq.{}", service_id));
        }
        if let Some(professional_id) = query.professional_id {
            query_parts.push(format!("professional_id=eq.{}", professional_id));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(from_date) = query.from_date {
            query_parts.push(format!("scheduled_at=gte.{}", from_date.to_rfc3339()));
        }
        if let Some(to_date) = query.to_date {
            query_parts.push(format!("scheduled_at=lte.{}", to_date.to_rfc3339()));
        }
        query_parts.push(format!("limit={}", query.limit.unwrap_or(100)));
        query_parts.push(format!("offset={}", query.offset.unwrap_or(0)));

        let path = format!(
            "/rest/v1/appointments?{}&order=scheduled_at.desc",
            query_parts.join("&")
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    pub async fn list_by_date(
        &self,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?scheduled_at=gte.{}&scheduled_at=lte.{}&order=scheduled_at.asc",
            start.to_rfc3339(),
            end.to_rfc3339()
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    pub async fn list_by_pet(
        &self,
        pet_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?pet_id=eq.{}&order=scheduled_at.desc",
            pet_id
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// Monday-to-Sunday week around the anchor date (today when absent).
    pub async fn calendar_week(
        &self,
        anchor: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<CalendarWeekResponse, AppointmentError> {
        let anchor = anchor.unwrap_or_else(|| Utc::now().date_naive());

        let days_from_monday = anchor.weekday().num_days_from_monday() as i64;
        let week_start = anchor - Duration::days(days_from_monday);
        let week_end = week_start + Duration::days(6);

        let start = week_start.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = week_end.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?scheduled_at=gte.{}&scheduled_at=lte.{}&order=scheduled_at.asc",
            start.to_rfc3339(),
            end.to_rfc3339()
        );

        let appointments: Vec<Appointment> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(CalendarWeekResponse {
            week_start,
            week_end,
            appointments,
        })
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn potential_conflicts(
        &self,
        candidate: &ScheduleCandidate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let professional = match &candidate.professional {
            Some(p) => p,
            None => return Ok(vec![]),
        };

        let (window_start, window_end) = self
            .validator
            .buffered_window(candidate.scheduled_at, candidate.duration_minutes);

        self.conflict_service
            .find_conflicting(
                professional.id,
                window_start,
                window_end,
                candidate.exclude_id,
                auth_token,
            )
            .await
    }

    async fn verify_pet_exists(&self, pet_id: Uuid, auth_token: &str) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/pets?id=eq.{}&is_active=eq.true&select=id", pet_id);

        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            warn!("Booking rejected, pet {} not found", pet_id);
            return Err(AppointmentError::PetNotFound);
        }
        Ok(())
    }

    async fn get_service(
        &self,
        service_id: Uuid,
        auth_token: &str,
    ) -> Result<Service, AppointmentError> {
        let path = format!("/rest/v1/services?id=eq.{}&is_active=eq.true", service_id);

        let result: Vec<Service> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(AppointmentError::ServiceNotFound)
    }

    async fn get_professional(
        &self,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Professional, AppointmentError> {
        let path = format!(
            "/rest/v1/professionals?id=eq.{}&is_active=eq.true",
            professional_id
        );

        let result: Vec<Professional> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or(AppointmentError::ProfessionalNotFound)
    }

    async fn patch_appointment(
        &self,
        appointment_id: Uuid,
        patch: Value,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);

        let result: Vec<Appointment> = self
            .store
            .request(Method::PATCH, &path, Some(auth_token), Some(patch))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(AppointmentError::NotFound)
    }
}
