use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::models::Appointment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCount {
    pub service_id: Uuid,
    pub service_name: String,
    pub count: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentsSummary {
    pub total_appointments: i64,
    pub by_status: Vec<StatusCount>,
    pub by_service: Vec<ServiceCount>,
    pub last_30_days: Vec<DayCount>,
    pub period: ReportPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayMetrics {
    pub total_appointments: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthMetrics {
    pub total_appointments: i64,
    pub revenue: f64,
    pub avg_per_day: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTotals {
    pub owners: i64,
    pub pets: i64,
    pub services: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub today: TodayMetrics,
    pub month: MonthMetrics,
    pub totals: EntityTotals,
    pub upcoming_appointments: Vec<Appointment>,
}

/// Health payload for the status endpoint: a liveness message plus entity
/// counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub message: String,
    pub user: String,
    pub counters: EntityCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCounters {
    pub owners: i64,
    pub pets: i64,
    pub services: i64,
    pub appointments: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReportError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}
