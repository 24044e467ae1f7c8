use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_database::store::StoreClient;

use crate::models::{Professional, ProfessionalError};

/// Read-only roster of active professionals. Assignments happen through the
/// appointment cell; this cell never writes.
pub struct RosterService {
    store: Arc<StoreClient>,
}

impl RosterService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    pub async fn list_active(&self, auth_token: &str) -> Result<Vec<Professional>, ProfessionalError> {
        debug!("Listing active professionals");

        let path = "/rest/v1/professionals?is_active=eq.true&order=name.asc";

        let result: Vec<Value> = self
            .store
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| ProfessionalError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Professional>, _>>()
            .map_err(|e| ProfessionalError::DatabaseError(format!("Failed to parse professionals: {}", e)))
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Professional, ProfessionalError> {
        let path = format!("/rest/v1/professionals?id=eq.{}&is_active=eq.true", id);

        let result: Vec<Professional> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ProfessionalError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(ProfessionalError::NotFound)
    }
}
