use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff member who can be assigned to an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    pub specialties: Vec<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfessionalError {
    #[error("Professional not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
