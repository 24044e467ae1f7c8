use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    NormalBath,
    MedicatedBath,
    Grooming,
    Deworming,
    GeneralCare,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::NormalBath => write!(f, "normal_bath"),
            ServiceType::MedicatedBath => write!(f, "medicated_bath"),
            ServiceType::Grooming => write!(f, "grooming"),
            ServiceType::Deworming => write!(f, "deworming"),
            ServiceType::GeneralCare => write!(f, "general_care"),
        }
    }
}

/// Catalog entry for a bookable clinic service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub service_type: ServiceType,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub requires_medication: bool,
    pub default_instructions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub service_type: ServiceType,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub requires_medication: Option<bool>,
    pub default_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub service_type: Option<ServiceType>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub requires_medication: Option<bool>,
    pub default_instructions: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Service not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
