use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentStatus};
use service_cell::models::Service;
use shared_database::store::StoreClient;

use crate::models::{
    ApiStatus, AppointmentsSummary, DashboardMetrics, DayCount, EntityCounters, EntityTotals,
    MonthMetrics, ReportError, ReportPeriod, ServiceCount, StatusCount, TodayMetrics,
};

/// Aggregates are computed in process over fetched rows; the store only does
/// range filtering. Clinic volumes keep these result sets small.
pub struct ReportService {
    store: Arc<StoreClient>,
}

impl ReportService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    pub async fn appointments_summary(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<AppointmentsSummary, ReportError> {
        debug!("Building appointments summary for {:?}..{:?}", start, end);

        let appointments = self.fetch_appointments(start, end, auth_token).await?;
        let services = self.fetch_services(auth_token).await?;

        let mut by_status: HashMap<String, i64> = HashMap::new();
        let mut by_service: HashMap<Uuid, i64> = HashMap::new();

        for appointment in &appointments {
            *by_status.entry(appointment.status.to_string()).or_insert(0) += 1;
            *by_service.entry(appointment.service_id).or_insert(0) += 1;
        }

        let mut by_status: Vec<StatusCount> = by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        by_status.sort_by(|a, b| a.status.cmp(&b.status));

        let mut by_service: Vec<ServiceCount> = by_service
            .into_iter()
            .map(|(service_id, count)| {
                let (service_name, price) = services
                    .get(&service_id)
                    .map(|s| (s.name.clone(), s.price))
                    .unwrap_or_else(|| ("unknown".to_string(), 0.0));
                ServiceCount {
                    service_id,
                    service_name,
                    count,
                    total_revenue: price * count as f64,
                }
            })
            .collect();
        by_service.sort_by(|a, b| b.count.cmp(&a.count));

        // Daily trend over the trailing 30 days
        let today = Utc::now().date_naive();
        let last_30_days: Vec<DayCount> = (0..30)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                let count = appointments
                    .iter()
                    .filter(|a| a.scheduled_at.date_naive() == date)
                    .count() as i64;
                DayCount { date, count }
            })
            .collect();

        Ok(AppointmentsSummary {
            total_appointments: appointments.len() as i64,
            by_status,
            by_service,
            last_30_days,
            period: ReportPeriod { start, end },
        })
    }

    pub async fn dashboard_metrics(&self, auth_token: &str) -> Result<DashboardMetrics, ReportError> {
        let now = Utc::now();
        let today = now.date_naive();
        let month_start = today.with_day(1).unwrap();

        let month_appointments = self
            .fetch_appointments(Some(month_start), None, auth_token)
            .await?;
        let services = self.fetch_services(auth_token).await?;

        let today_appointments: Vec<&Appointment> = month_appointments
            .iter()
            .filter(|a| a.scheduled_at.date_naive() == today)
            .collect();

        let count_status = |status: AppointmentStatus| -> i64 {
            today_appointments
                .iter()
                .filter(|a| a.status == status)
                .count() as i64
        };

        let revenue: f64 = month_appointments
            .iter()
            .filter_map(|a| services.get(&a.service_id).map(|s| s.price))
            .sum();

        let upcoming_path = format!(
            "/rest/v1/appointments?scheduled_at=gte.{}&status=in.(pending,confirmed)&order=scheduled_at.asc&limit=5",
            now.to_rfc3339()
        );
        let upcoming: Vec<Appointment> = self
            .store
            .request(Method::GET, &upcoming_path, Some(auth_token), None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        Ok(DashboardMetrics {
            today: TodayMetrics {
                total_appointments: today_appointments.len() as i64,
                pending: count_status(AppointmentStatus::Pending),
                confirmed: count_status(AppointmentStatus::Confirmed),
                completed: count_status(AppointmentStatus::Completed),
            },
            month: MonthMetrics {
                total_appointments: month_appointments.len() as i64,
                revenue,
                avg_per_day: month_appointments.len() as f64 / now.day() as f64,
            },
            totals: EntityTotals {
                owners: self.count_rows("owners", true, auth_token).await?,
                pets: self.count_rows("pets", true, auth_token).await?,
                services: self.count_rows("services", true, auth_token).await?,
            },
            upcoming_appointments: upcoming,
        })
    }

    pub async fn api_status(&self, username: &str, auth_token: &str) -> Result<ApiStatus, ReportError> {
        Ok(ApiStatus {
            message: "API running".to_string(),
            user: username.to_string(),
            counters: EntityCounters {
                owners: self.count_rows("owners", true, auth_token).await?,
                pets: self.count_rows("pets", true, auth_token).await?,
                services: self.count_rows("services", true, auth_token).await?,
                appointments: self.count_rows("appointments", false, auth_token).await?,
            },
        })
    }

    pub(crate) async fn fetch_appointments(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, ReportError> {
        let mut query_parts = Vec::new();

        if let Some(start) = start {
            let from = start.and_hms_opt(0, 0, 0).unwrap().and_utc();
            query_parts.push(format!("scheduled_at=gte.{}", from.to_rfc3339()));
        }
        if let Some(end) = end {
            let to = end.and_hms_opt(23, 59, 59).unwrap().and_utc();
            query_parts.push(format!("scheduled_at=lte.{}", to.to_rfc3339()));
        }
        query_parts.push("order=scheduled_at.asc".to_string());

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));

        self.store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))
    }

    pub(crate) async fn fetch_services(
        &self,
        auth_token: &str,
    ) -> Result<HashMap<Uuid, Service>, ReportError> {
        let services: Vec<Service> = self
            .store
            .request(Method::GET, "/rest/v1/services", Some(auth_token), None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        Ok(services.into_iter().map(|s| (s.id, s)).collect())
    }

    async fn count_rows(
        &self,
        table: &str,
        only_active: bool,
        auth_token: &str,
    ) -> Result<i64, ReportError> {
        let path = if only_active {
            format!("/rest/v1/{}?is_active=eq.true&select=id", table)
        } else {
            format!("/rest/v1/{}?select=id", table)
        };

        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ReportError::DatabaseError(e.to_string()))?;

        Ok(rows.len() as i64)
    }
}
