use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{
    AppointmentError, AppointmentStatus, BookAppointmentRequest, StatusUpdateRequest,
};
use appointment_cell::services::booking::BookingService;
use assert_matches::assert_matches;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

const TOKEN: &str = "test-token";

fn scheduled_at() -> chrono::DateTime<chrono::Utc> {
    // Far enough out to stay in the future, 10:00 inside business hours
    Utc.with_ymd_and_hms(2030, 6, 3, 10, 0, 0).unwrap()
}

fn booking_request(
    pet_id: Uuid,
    service_id: Uuid,
    professional_id: Option<Uuid>,
) -> BookAppointmentRequest {
    BookAppointmentRequest {
        pet_id,
        service_id,
        professional_id,
        scheduled_at: scheduled_at(),
        reason: Some("Annual check".to_string()),
        medication_type: None,
        medication_dosage: None,
        instructions: None,
    }
}

async fn mock_get(server: &MockServer, endpoint: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

#[tokio::test]
async fn books_appointment_without_professional() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let pet_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    mock_get(
        &mock_server,
        "/rest/v1/pets",
        json!([MockStoreRows::pet_row(&pet_id.to_string(), "Rocky", &Uuid::new_v4().to_string())]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/services",
        json!([MockStoreRows::service_row(&service_id.to_string(), "Normal bath", false)]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::appointment_row(
                &appointment_id.to_string(),
                &pet_id.to_string(),
                &service_id.to_string(),
                None,
                scheduled_at(),
                60,
                "pending",
            )
        ])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&config);
    let appointment = service
        .book(booking_request(pet_id, service_id, None), None, TOKEN)
        .await
        .unwrap();

    assert_eq!(appointment.id, appointment_id);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn rejects_booking_for_unknown_pet() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    mock_get(&mock_server, "/rest/v1/pets", json!([])).await;

    let service = BookingService::new(&config);
    let result = service
        .book(booking_request(Uuid::new_v4(), Uuid::new_v4(), None), None, TOKEN)
        .await;

    assert_matches!(result, Err(AppointmentError::PetNotFound));
}

#[tokio::test]
async fn rejects_medicated_service_without_medication_type() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let pet_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();

    mock_get(
        &mock_server,
        "/rest/v1/pets",
        json!([MockStoreRows::pet_row(&pet_id.to_string(), "Rocky", &Uuid::new_v4().to_string())]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/services",
        json!([MockStoreRows::service_row(&service_id.to_string(), "Medicated bath", true)]),
    )
    .await;
    // No POST mock: validation must stop the write

    let service = BookingService::new(&config);
    let result = service
        .book(booking_request(pet_id, service_id, None), None, TOKEN)
        .await;

    assert_matches!(
        result,
        Err(AppointmentError::MissingMedicationInfo { ref service }) if service == "Medicated bath"
    );
}

#[tokio::test]
async fn rejects_overlapping_booking_for_same_professional() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let pet_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();
    let professional_id = Uuid::new_v4();

    mock_get(
        &mock_server,
        "/rest/v1/pets",
        json!([MockStoreRows::pet_row(&pet_id.to_string(), "Rocky", &Uuid::new_v4().to_string())]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/services",
        json!([MockStoreRows::service_row(&service_id.to_string(), "Grooming", false)]),
    )
    .await;
    mock_get(
        &mock_server,
        "/rest/v1/professionals",
        json!([MockStoreRows::professional_row(&professional_id.to_string(), "Dra. Morales")]),
    )
    .await;
    // Confirmed appointment half an hour before the candidate
    let existing_start = Utc.with_ymd_and_hms(2030, 6, 3, 9, 30, 0).unwrap();
    mock_get(
        &mock_server,
        "/rest/v1/appointments",
        json!([MockStoreRows::appointment_row(
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            &service_id.to_string(),
            Some(&professional_id.to_string()),
            existing_start,
            60,
            "confirmed",
        )]),
    )
    .await;

    let service = BookingService::new(&config);
    let result = service
        .book(booking_request(pet_id, service_id, Some(professional_id)), None, TOKEN)
        .await;

    assert_matches!(
        result,
        Err(AppointmentError::ProfessionalDoubleBooked { ref name }) if name == "Dra. Morales"
    );
}

#[tokio::test]
async fn completing_an_appointment_fills_actual_times() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let appointment_id = Uuid::new_v4();
    let pet_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();

    mock_get(
        &mock_server,
        "/rest/v1/appointments",
        json!([MockStoreRows::appointment_row(
            &appointment_id.to_string(),
            &pet_id.to_string(),
            &service_id.to_string(),
            None,
            scheduled_at(),
            60,
            "confirmed",
        )]),
    )
    .await;

    let mut completed_row = MockStoreRows::appointment_row(
        &appointment_id.to_string(),
        &pet_id.to_string(),
        &service_id.to_string(),
        None,
        scheduled_at(),
        60,
        "completed",
    );
    completed_row["actual_start_time"] = json!(scheduled_at());
    completed_row["actual_end_time"] = json!(Utc::now());

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([completed_row])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&config);
    let appointment = service
        .update_status(
            appointment_id,
            StatusUpdateRequest {
                status: "completed".to_string(),
            },
            TOKEN,
        )
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Completed);
    assert!(appointment.actual_start_time.is_some());
    assert!(appointment.actual_end_time.is_some());
}

#[tokio::test]
async fn unknown_status_value_is_rejected_before_any_read() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let service = BookingService::new(&config);
    let result = service
        .update_status(
            Uuid::new_v4(),
            StatusUpdateRequest {
                status: "done".to_string(),
            },
            TOKEN,
        )
        .await;

    assert_matches!(result, Err(AppointmentError::InvalidStatus(ref s)) if s == "done");
}

#[tokio::test]
async fn deleting_a_completed_appointment_is_refused() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let appointment_id = Uuid::new_v4();
    mock_get(
        &mock_server,
        "/rest/v1/appointments",
        json!([MockStoreRows::appointment_row(
            &appointment_id.to_string(),
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            None,
            scheduled_at(),
            60,
            "completed",
        )]),
    )
    .await;
    // No DELETE mock: the protected row must never reach the store

    let service = BookingService::new(&config);
    let result = service.delete(appointment_id, TOKEN).await;

    assert_matches!(result, Err(AppointmentError::CannotDeleteCompleted));
}

#[tokio::test]
async fn deleting_a_cancelled_appointment_succeeds() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_database_url(&mock_server.uri());

    let appointment_id = Uuid::new_v4();
    mock_get(
        &mock_server,
        "/rest/v1/appointments",
        json!([MockStoreRows::appointment_row(
            &appointment_id.to_string(),
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            None,
            scheduled_at(),
            60,
            "cancelled",
        )]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(&config);
    assert!(service.delete(appointment_id, TOKEN).await.is_ok());
}
