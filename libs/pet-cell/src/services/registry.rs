use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::store::StoreClient;

use crate::models::{CreatePetRequest, MedicalHistory, Pet, PetError, UpdatePetRequest};

const DEFAULT_SPECIES: &str = "canine";
const MAX_PLAUSIBLE_AGE_YEARS: i64 = 20;
const MAX_PLAUSIBLE_WEIGHT_KG: f64 = 100.0;

pub struct PetRegistryService {
    store: Arc<StoreClient>,
}

impl PetRegistryService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), PetError> {
        if birth_date > today {
            return Err(PetError::ValidationError(
                "Birth date cannot be in the future".to_string(),
            ));
        }
        let years_ago = (today - birth_date).num_days() / 365;
        if years_ago > MAX_PLAUSIBLE_AGE_YEARS {
            return Err(PetError::ValidationError(
                "Birth date looks too old, please verify".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_weight(weight: f64) -> Result<(), PetError> {
        if weight <= 0.0 {
            return Err(PetError::ValidationError(
                "Weight must be greater than 0".to_string(),
            ));
        }
        if weight > MAX_PLAUSIBLE_WEIGHT_KG {
            return Err(PetError::ValidationError(
                "Weight looks too high, please verify".to_string(),
            ));
        }
        Ok(())
    }

    async fn verify_owner_active(&self, owner_id: Uuid, auth_token: &str) -> Result<(), PetError> {
        let path = format!("/rest/v1/owners?id=eq.{}&is_active=eq.true&select=id", owner_id);

        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(PetError::OwnerNotFound);
        }
        Ok(())
    }

    pub async fn create(
        &self,
        request: CreatePetRequest,
        auth_token: &str,
    ) -> Result<Pet, PetError> {
        let today = Utc::now().date_naive();
        Self::validate_birth_date(request.birth_date, today)?;
        Self::validate_weight(request.weight)?;
        self.verify_owner_active(request.owner_id, auth_token).await?;

        let body = json!({
            "id": Uuid::new_v4(),
            "name": request.name,
            "species": DEFAULT_SPECIES,
            "breed": request.breed,
            "birth_date": request.birth_date,
            "gender": request.gender,
            "color": request.color,
            "weight": request.weight,
            "allergies": request.allergies,
            "medical_conditions": request.medical_conditions,
            "additional_notes": request.additional_notes,
            "owner_id": request.owner_id,
            "is_active": true,
        });

        let result: Vec<Pet> = self
            .store
            .request(Method::POST, "/rest/v1/pets", Some(auth_token), Some(body))
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        let pet = result
            .into_iter()
            .next()
            .ok_or_else(|| PetError::DatabaseError("Store returned no row".to_string()))?;

        info!("Pet {} registered ({})", pet.id, pet.name);
        Ok(pet)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePetRequest,
        auth_token: &str,
    ) -> Result<Pet, PetError> {
        let today = Utc::now().date_naive();
        if let Some(birth_date) = request.birth_date {
            Self::validate_birth_date(birth_date, today)?;
        }
        if let Some(weight) = request.weight {
            Self::validate_weight(weight)?;
        }
        if let Some(owner_id) = request.owner_id {
            self.verify_owner_active(owner_id, auth_token).await?;
        }

        let mut patch = serde_json::Map::new();
        if let Some(name) = request.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(breed) = request.breed {
            patch.insert("breed".to_string(), json!(breed));
        }
        if let Some(birth_date) = request.birth_date {
            patch.insert("birth_date".to_string(), json!(birth_date));
        }
        if let Some(gender) = request.gender {
            patch.insert("gender".to_string(), json!(gender));
        }
        if let Some(color) = request.color {
            patch.insert("color".to_string(), json!(color));
        }
        if let Some(weight) = request.weight {
            patch.insert("weight".to_string(), json!(weight));
        }
        if let Some(allergies) = request.allergies {
            patch.insert("allergies".to_string(), json!(allergies));
        }
        if let Some(medical_conditions) = request.medical_conditions {
            patch.insert("medical_conditions".to_string(), json!(medical_conditions));
        }
        if let Some(additional_notes) = request.additional_notes {
            patch.insert("additional_notes".to_string(), json!(additional_notes));
        }
        if let Some(owner_id) = request.owner_id {
            patch.insert("owner_id".to_string(), json!(owner_id));
        }
        if let Some(is_active) = request.is_active {
            patch.insert("is_active".to_string(), json!(is_active));
        }

        let path = format!("/rest/v1/pets?id=eq.{}", id);
        let result: Vec<Pet> = self
            .store
            .request(Method::PATCH, &path, Some(auth_token), Some(Value::Object(patch)))
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(PetError::NotFound)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Pet, PetError> {
        let path = format!("/rest/v1/pets?id=eq.{}&is_active=eq.true", id);

        let result: Vec<Pet> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(PetError::NotFound)
    }

    pub async fn list_active(&self, auth_token: &str) -> Result<Vec<Pet>, PetError> {
        debug!("Listing active pets");

        let path = "/rest/v1/pets?is_active=eq.true&order=name.asc";

        self.store
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_breed(&self, breed: &str, auth_token: &str) -> Result<Vec<Pet>, PetError> {
        let path = format!(
            "/rest/v1/pets?is_active=eq.true&breed=ilike.*{}*&order=name.asc",
            urlencoding::encode(breed)
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))
    }

    /// Search by the owner's name. Two round-trips: matching owners first,
    /// then their pets.
    pub async fn find_by_owner_name(
        &self,
        owner_name: &str,
        auth_token: &str,
    ) -> Result<Vec<Pet>, PetError> {
        let owners_path = format!(
            "/rest/v1/owners?is_active=eq.true&full_name=ilike.*{}*&select=id",
            urlencoding::encode(owner_name)
        );

        let owners: Vec<Value> = self
            .store
            .request(Method::GET, &owners_path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        let owner_ids: Vec<String> = owners
            .iter()
            .filter_map(|row| row.get("id").and_then(|id| id.as_str()).map(String::from))
            .collect();

        if owner_ids.is_empty() {
            return Ok(vec![]);
        }

        let pets_path = format!(
            "/rest/v1/pets?is_active=eq.true&owner_id=in.({})&order=name.asc",
            owner_ids.join(",")
        );

        self.store
            .request(Method::GET, &pets_path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))
    }

    /// Pet record plus the last five attended appointments.
    pub async fn medical_history(
        &self,
        id: Uuid,
        auth_token: &str,
    ) -> Result<MedicalHistory, PetError> {
        let pet = self.get(id, auth_token).await?;

        let appointments_path = format!(
            "/rest/v1/appointments?pet_id=eq.{}&status=in.(completed,confirmed)&order=scheduled_at.desc&limit=5&select=scheduled_at,service_id,observations,status",
            id
        );

        let recent_appointments: Vec<Value> = self
            .store
            .request(Method::GET, &appointments_path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        Ok(MedicalHistory {
            allergies: pet.allergies.clone(),
            medical_conditions: pet.medical_conditions.clone(),
            additional_notes: pet.additional_notes.clone(),
            recent_appointments,
            pet,
        })
    }

    pub async fn delete(&self, id: Uuid, auth_token: &str) -> Result<(), PetError> {
        self.get(id, auth_token).await?;

        let path = format!("/rest/v1/pets?id=eq.{}", id);
        self.store
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        info!("Pet {} deleted", id);
        Ok(())
    }
}
