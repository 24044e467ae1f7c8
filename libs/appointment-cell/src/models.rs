use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    /// Snapshot of the service duration at booking time.
    pub duration_minutes: i32,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub medication_type: Option<String>,
    pub medication_dosage: Option<String>,
    pub instructions: Option<String>,
    pub observations: Option<String>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled_end_time(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// Human-friendly duration, e.g. "45 min" or "1h 30min".
    pub fn duration_display(&self) -> String {
        let minutes = self.duration_minutes;
        if minutes < 60 {
            return format!("{} min", minutes);
        }
        let hours = minutes / 60;
        let remaining_minutes = minutes % 60;
        if remaining_minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}min", hours, remaining_minutes)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses that hold a professional's time slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub medication_type: Option<String>,
    pub medication_dosage: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub service_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub medication_type: Option<String>,
    pub medication_dosage: Option<String>,
    pub instructions: Option<String>,
    pub observations: Option<String>,
}

/// Narrow entry point: only the status may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub pet_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarWeekResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// SCHEDULING MODELS
// ==============================================================================

/// Professional fields the validator needs for its rejection message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalRef {
    pub id: Uuid,
    pub name: String,
}

/// Everything the scheduling validator looks at for one candidate
/// appointment, new or edited.
#[derive(Debug, Clone)]
pub struct ScheduleCandidate {
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub professional: Option<ProfessionalRef>,
    pub service_name: String,
    pub requires_medication: bool,
    pub medication_type: Option<String>,
    /// Set when editing, so the appointment does not conflict with itself.
    pub exclude_id: Option<Uuid>,
}

/// Clinic-wide scheduling rules. The opening range is the canonical
/// 08:00-16:00 window; clinics with longer hours override the struct.
#[derive(Debug, Clone)]
pub struct SchedulingRules {
    pub open_hour: u32,
    pub close_hour: u32,
    pub buffer_before_minutes: i64,
    pub max_backdate_days: i64,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            open_hour: 8,
            close_hour: 16,
            buffer_before_minutes: 60,
            max_backdate_days: 1,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointments cannot be created more than {0} day(s) in the past")]
    StaleSchedule(i64),

    #[error("Appointments must be between {open}:00 and {close}:00")]
    OutsideBusinessHours { open: u32, close: u32 },

    #[error("Professional {name} already has an appointment in that time slot")]
    ProfessionalDoubleBooked { name: String },

    #[error("Service {service} requires the medication to be specified")]
    MissingMedicationInfo { service: String },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Completed appointments cannot be deleted")]
    CannotDeleteCompleted,

    #[error("Appointment not found")]
    NotFound,

    #[error("Pet not found")]
    PetNotFound,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
