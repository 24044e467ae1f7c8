use chrono::{NaiveDate, DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub color: String,
    pub weight: f64,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub owner_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    /// Age in whole months, using the 30.44-day average month.
    pub fn age_in_months(&self, today: NaiveDate) -> i32 {
        let age_days = (today - self.birth_date).num_days();
        (age_days as f64 / 30.44) as i32
    }

    pub fn age_display(&self, today: NaiveDate) -> String {
        let months = self.age_in_months(today);
        if months < 12 {
            return format!("{} months", months);
        }
        let years = months / 12;
        let remaining_months = months % 12;
        if remaining_months == 0 {
            format!("{} year{}", years, if years > 1 { "s" } else { "" })
        } else {
            format!(
                "{} year{} and {} months",
                years,
                if years > 1 { "s" } else { "" },
                remaining_months
            )
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub color: String,
    pub weight: f64,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub owner_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Basic medical history view assembled from the pet record plus its most
/// recent attended appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub pet: Pet,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub recent_appointments: Vec<Value>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PetError {
    #[error("Pet not found")]
    NotFound,

    #[error("Owner not found or inactive")]
    OwnerNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
