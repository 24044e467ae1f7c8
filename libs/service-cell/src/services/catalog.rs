use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::store::StoreClient;

use crate::models::{CreateServiceRequest, Service, ServiceError, ServiceType, UpdateServiceRequest};

pub struct CatalogService {
    store: Arc<StoreClient>,
}

impl CatalogService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    fn validate_duration(duration_minutes: i32) -> Result<(), ServiceError> {
        if duration_minutes <= 0 {
            return Err(ServiceError::ValidationError(
                "Service duration must be a positive number of minutes".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_price(price: f64) -> Result<(), ServiceError> {
        if price < 0.0 {
            return Err(ServiceError::ValidationError(
                "Service price cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        request: CreateServiceRequest,
        auth_token: &str,
    ) -> Result<Service, ServiceError> {
        Self::validate_duration(request.duration_minutes)?;
        Self::validate_price(request.price)?;

        let body = json!({
            "id": Uuid::new_v4(),
            "name": request.name,
            "service_type": request.service_type,
            "description": request.description,
            "duration_minutes": request.duration_minutes,
            "price": request.price,
            "requires_medication": request.requires_medication.unwrap_or(false),
            "default_instructions": request.default_instructions,
            "is_active": true,
        });

        let result: Vec<Service> = self
            .store
            .request(Method::POST, "/rest/v1/services", Some(auth_token), Some(body))
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let service = result
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::DatabaseError("Store returned no row".to_string()))?;

        info!("Service {} created ({})", service.id, service.name);
        Ok(service)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateServiceRequest,
        auth_token: &str,
    ) -> Result<Service, ServiceError> {
        if let Some(duration) = request.duration_minutes {
            Self::validate_duration(duration)?;
        }
        if let Some(price) = request.price {
            Self::validate_price(price)?;
        }

        // Only send the fields the caller provided
        let mut patch = serde_json::Map::new();
        if let Some(name) = request.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(service_type) = request.service_type {
            patch.insert("service_type".to_string(), json!(service_type));
        }
        if let Some(description) = request.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(duration) = request.duration_minutes {
            patch.insert("duration_minutes".to_string(), json!(duration));
        }
        if let Some(price) = request.price {
            patch.insert("price".to_string(), json!(price));
        }
        if let Some(requires_medication) = request.requires_medication {
            patch.insert("requires_medication".to_string(), json!(requires_medication));
        }
        if let Some(instructions) = request.default_instructions {
            patch.insert("default_instructions".to_string(), json!(instructions));
        }
        if let Some(is_active) = request.is_active {
            patch.insert("is_active".to_string(), json!(is_active));
        }

        let path = format!("/rest/v1/services?id=eq.{}", id);
        let result: Vec<Service> = self
            .store
            .request(Method::PATCH, &path, Some(auth_token), Some(Value::Object(patch)))
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(ServiceError::NotFound)
    }

    pub async fn get(&self, id: Uuid, auth_token: &str) -> Result<Service, ServiceError> {
        let path = format!("/rest/v1/services?id=eq.{}", id);

        let result: Vec<Service> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(ServiceError::NotFound)
    }

    pub async fn list_active(&self, auth_token: &str) -> Result<Vec<Service>, ServiceError> {
        debug!("Listing active services");

        let path = "/rest/v1/services?is_active=eq.true&order=service_type.asc,name.asc";

        self.store
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    pub async fn list_by_type(
        &self,
        service_type: ServiceType,
        auth_token: &str,
    ) -> Result<Vec<Service>, ServiceError> {
        let path = format!(
            "/rest/v1/services?is_active=eq.true&service_type=eq.{}&order=name.asc",
            service_type
        );

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: Uuid, auth_token: &str) -> Result<(), ServiceError> {
        // Existence check first so a missing id maps to 404, not a silent no-op
        self.get(id, auth_token).await?;

        let path = format!("/rest/v1/services?id=eq.{}", id);
        self.store
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        info!("Service {} deleted", id);
        Ok(())
    }
}
