use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use report_cell::services::export::ExportService;
use report_cell::services::summary::ReportService;
use shared_database::store::StoreClient;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

const TOKEN: &str = "test-token";

async fn mock_get(server: &MockServer, endpoint: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

fn store_for(url: &str) -> Arc<StoreClient> {
    Arc::new(StoreClient::new(&TestConfig::with_database_url(url)))
}

#[tokio::test]
async fn csv_export_resolves_names_across_tables() {
    let mock_server = MockServer::start().await;

    let owner_id = Uuid::new_v4();
    let pet_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();
    let scheduled_at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();

    mock_get(
        &mock_server,
        "/rest/v1/appointments",
        json!([MockStoreRows::appointment_row(
            &Uuid::new_v4().to_string(),
            &pet_id.to_string(),
            &service_id.to_string(),
            None,
            scheduled_at,
            60,
            "confirmed",
        )]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/services",
        json!([MockStoreRows::service_row(&service_id.to_string(), "Normal bath", false)]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/pets",
        json!([MockStoreRows::pet_row(&pet_id.to_string(), "Rocky", &owner_id.to_string())]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/owners",
        json!([MockStoreRows::owner_row(&owner_id.to_string(), "Carlos Mendoza Vera")]),
    )
    .await;

    let service = ExportService::new(store_for(&mock_server.uri()));
    let bytes = service
        .export_appointments_csv(None, None, TOKEN)
        .await
        .unwrap();

    let csv = String::from_utf8(bytes).unwrap();
    let mut lines = csv.lines();

    assert_eq!(
        lines.next().unwrap(),
        "Date,Time,Pet,Owner,Service,Status,Price,Observations"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("2025-06-02"));
    assert!(row.contains("10:00"));
    assert!(row.contains("Rocky"));
    assert!(row.contains("Carlos Mendoza Vera"));
    assert!(row.contains("Normal bath"));
    assert!(row.contains("confirmed"));
    assert!(row.contains("$25.00"));
}

#[tokio::test]
async fn summary_counts_by_status_and_service() {
    let mock_server = MockServer::start().await;

    let service_id = Uuid::new_v4();
    let scheduled_at = Utc::now() - chrono::Duration::days(1);

    let mut rows = Vec::new();
    for status in ["pending", "confirmed", "confirmed", "completed"] {
        rows.push(MockStoreRows::appointment_row(
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            &service_id.to_string(),
            None,
            scheduled_at,
            60,
            status,
        ));
    }

    mock_get(&mock_server, "/rest/v1/appointments", json!(rows)).await;
    mock_get(
        &mock_server,
        "/rest/v1/services",
        json!([MockStoreRows::service_row(&service_id.to_string(), "Normal bath", false)]),
    )
    .await;

    let service = ReportService::new(store_for(&mock_server.uri()));
    let summary = service
        .appointments_summary(None, None, TOKEN)
        .await
        .unwrap();

    assert_eq!(summary.total_appointments, 4);

    let confirmed = summary
        .by_status
        .iter()
        .find(|s| s.status == "confirmed")
        .unwrap();
    assert_eq!(confirmed.count, 2);

    let by_service = &summary.by_service[0];
    assert_eq!(by_service.service_name, "Normal bath");
    assert_eq!(by_service.count, 4);
    assert_eq!(by_service.total_revenue, 100.0);

    // Yesterday's appointments land on the matching trend day
    let yesterday = (Utc::now() - chrono::Duration::days(1)).date_naive();
    let trend_day = summary
        .last_30_days
        .iter()
        .find(|d| d.date == yesterday)
        .unwrap();
    assert_eq!(trend_day.count, 4);
}
