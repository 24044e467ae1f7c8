use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use shared_database::store::StoreClient;

use crate::models::ReportError;
use crate::services::summary::ReportService;

/// CSV export of appointments over a date range. Pets, owners and service
/// names are resolved through in-process lookup maps.
pub struct ExportService {
    store: Arc<StoreClient>,
    reports: ReportService,
}

impl ExportService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self {
            reports: ReportService::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn export_appointments_csv(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<u8>, ReportError> {
        let appointments = self.reports.fetch_appointments(start, end, auth_token).await?;
        let services = self.reports.fetch_services(auth_token).await?;
        let pets = self.fetch_lookup("pets", "id,name,owner_id", auth_token).await?;
        let owners = self.fetch_lookup("owners", "id,full_name", auth_token).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "Date",
                "Time",
                "Pet",
                "Owner",
                "Service",
                "Status",
                "Price",
                "Observations",
            ])
            .map_err(|e| ReportError::ExportError(e.to_string()))?;

        for appointment in &appointments {
            let pet = pets.get(&appointment.pet_id);
            let pet_name = pet
                .and_then(|p| p.get("name").and_then(Value::as_str))
                .unwrap_or("");
            let owner_name = pet
                .and_then(|p| p.get("owner_id").and_then(Value::as_str))
                .and_then(|owner_id| Uuid::parse_str(owner_id).ok())
                .and_then(|owner_id| owners.get(&owner_id))
                .and_then(|o| o.get("full_name").and_then(Value::as_str))
                .unwrap_or("");
            let (service_name, price) = services
                .get(&appointment.service_id)
                .map(|s| (s.name.as_str(), s.price))
                .unwrap_or(("", 0.0));

            writer
                .write_record([
                    appointment.scheduled_at.format("%Y-%m-%d").to_string(),
                    appointment.scheduled_at.format("%H:%M").to_string(),
                    pet_name.to_string(),
                    owner_name.to_string(),
                    service_name.to_string(),
                    appointment.status.to_string(),
                    format!("${:.2}", price),
                    appointment.observations.clone().unwrap_or_default(),
                ])
                .map_err(|e| ReportError::ExportError(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::ExportError(e.to_string()))?;

        info!("Exported {} appointments to CSV", appointments.len());
        Ok(bytes)
    }

    async fn fetch_lookup(
        &self,
        table: &str,
        select: &str,
        auth_token: &str,
    ) -> Result<HashMap<Uuid, Value>, ReportError> {
        let path = format!("/rest/v1/{}?select={}", table, select);

        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row
                    .get("id")
                    .and_then(Value::as_str)
                    .and_then(|id| Uuid::parse_str(id).ok())?;
                Some((id, row))
            })
            .collect())
    }
}
