use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_database::store::StoreClient;

use crate::models::{Appointment, AppointmentError};

/// Fetches the appointments that could collide with a candidate window.
/// The store query is a coarse range filter on `scheduled_at`; the precise
/// buffered-window intersection happens in the scheduling validator.
pub struct ConflictService {
    store: Arc<StoreClient>,
    buffer_before_minutes: i64,
}

impl ConflictService {
    pub fn new(store: Arc<StoreClient>, buffer_before_minutes: i64) -> Self {
        Self {
            store,
            buffer_before_minutes,
        }
    }

    pub async fn find_conflicting(
        &self,
        professional_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!(
            "Fetching potential conflicts for professional {} between {} and {}",
            professional_id, window_start, window_end
        );

        // A day of slack on the left covers any earlier appointment whose
        // duration reaches into the candidate window; durations never exceed
        // a working day. The right edge accounts for the other side's buffer.
        let range_start = window_start - Duration::days(1);
        let range_end = window_end + Duration::minutes(self.buffer_before_minutes);

        let mut query_parts = vec![
            format!("professional_id=eq.{}", professional_id),
            "status=in.(pending,confirmed)".to_string(),
            format!("scheduled_at=gte.{}", range_start.to_rfc3339()),
            format!("scheduled_at=lt.{}", range_end.to_rfc3339()),
        ];

        if let Some(exclude) = exclude_id {
            query_parts.push(format!("id=neq.{}", exclude));
        }

        let path = format!(
            "/rest/v1/appointments?{}&order=scheduled_at.asc",
            query_parts.join("&")
        );

        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                AppointmentError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })
    }
}
