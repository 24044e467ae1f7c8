use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use pet_cell::models::Pet;
use shared_database::store::StoreClient;

use crate::models::{CreateOwnerRequest, Owner, OwnerError, UpdateOwnerRequest};

pub struct OwnerRegistryService {
    store: Arc<StoreClient>,
}

impl OwnerRegistryService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    fn validate_identification_number(value: &str) -> Result<(), OwnerError> {
        if value.len() < 6 {
            return Err(OwnerError::ValidationError(
                "Identification number must be at least 6 characters long".to_string(),
            ));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || c == '-')
        {
            return Err(OwnerError::ValidationError(
                "Identification number may only contain digits, uppercase letters and dashes"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn validate_phone(value: &str) -> Result<(), OwnerError> {
        let clean_phone: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        if clean_phone.trim_start_matches('+').len() < 7 {
            return Err(OwnerError::ValidationError(
                "Phone number must have at least 7 digits".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        request: CreateOwnerRequest,
        auth_token: &str,
    ) -> Result<Owner, OwnerError> {
        Self::validate_identification_number(&request.identification_number)?;
        Self::validate_phone(&request.phone)?;

        let body = json!({
            "id": Uuid::new_v4(),
            "full_name": request.full_name,
            "identification_type": request.identification_type,
            "identification_number": request.identification_number,
            "address": request.address,
            "phone": request.phone,
            "email": request.email,
            "is_active": true,
        });

        let result: Vec<Owner> = self
            .store
            .request(Method::POST, "/rest/v1/owners", Some(auth_token), Some(body))
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))?;

        let owner = result
            .into_iter()
            .next()
            .ok_or_else(|| OwnerError::DatabaseError("Store returned no row".to_string()))?;

        info!("Owner {} registered ({})", owner.id, owner.full_name);
        Ok(owner)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOwnerRequest,
        auth_token: &str,
    ) -> Result<Owner, OwnerError> {
        if let Some(identification_number) = &request.identification_number {
            Self::validate_identification_number(identification_number)?;
        }
        if let Some(phone) = &request.phone {
            Self::validate_phone(phone)?;
        }

        let mut patch = serde_json::Map::new();
        if let Some(full_name) = request.full_name {
            patch.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(identification_type) = request.identification_type {
            patch.insert("identification_type".to_string(), json!(identification_type));
        }
        if let Some(identification_number) = request.identification_number {
            patch.insert(
                "identification_number".to_string(),
                json!(identification_number),
            );
        }
        if let Some(address) = request.address {
            patch.insert("address".to_string(), json!(address));
        }
        if let Some(phone) = request.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(email) = request.email {
            patch.insert("email".to_string(), json!(email));
        }
        if let Some(is_active) = request.is_active {
            patch.insert("is_active".to_string(), json!(is_active));
        }

        let path = format!("/rest/v1/owners?id=eq.{}", id);
        let result: Vec<Owner> = self
            .store
            .request(Method::PATCH, &path, Some(auth_token), Some(Value::Object(patch)))
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(OwnerError::NotFound)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Owner, OwnerError> {
        let path = format!("/rest/v1/owners?id=eq.{}&is_active=eq.true", id);

        let result: Vec<Owner> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(OwnerError::NotFound)
    }

    pub async fn list_active(&self, auth_token: &str) -> Result<Vec<Owner>, OwnerError> {
        debug!("Listing active owners");

        let path = "/rest/v1/owners?is_active=eq.true&order=full_name.asc";

        self.store
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_identification(
        &self,
        identification_number: &str,
        auth_token: &str,
    ) -> Result<Owner, OwnerError> {
        let path = format!(
            "/rest/v1/owners?identification_number=eq.{}&is_active=eq.true",
            identification_number
        );

        let result: Vec<Owner> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(OwnerError::NotFound)
    }

    /// Active pets registered to this owner.
    pub async fn pets(&self, owner_id: Uuid, auth_token: &str) -> Result<Vec<Pet>, OwnerError> {
        self.get(owner_id, auth_token).await?;

        let path = format!(
            "/rest/v1/pets?owner_id=eq.{}&is_active=eq.true&order=name.asc",
            owner_id
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: Uuid, auth_token: &str) -> Result<(), OwnerError> {
        self.get(id, auth_token).await?;

        let path = format!("/rest/v1/owners?id=eq.{}", id);
        self.store
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|e| OwnerError::DatabaseError(e.to_string()))?;

        info!("Owner {} deleted", id);
        Ok(())
    }
}
