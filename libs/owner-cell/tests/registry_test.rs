use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use owner_cell::models::{CreateOwnerRequest, IdentificationType, OwnerError};
use owner_cell::services::registry::OwnerRegistryService;
use shared_database::store::StoreClient;
use shared_utils::test_utils::{MockStoreRows, TestConfig};

const TOKEN: &str = "test-token";

fn create_request(identification_number: &str, phone: &str) -> CreateOwnerRequest {
    CreateOwnerRequest {
        full_name: "Carlos Mendoza Vera".to_string(),
        identification_type: IdentificationType::Cedula,
        identification_number: identification_number.to_string(),
        address: "Av. Amazonas N24-03".to_string(),
        phone: phone.to_string(),
        email: None,
    }
}

fn registry_for(url: &str) -> OwnerRegistryService {
    let config = TestConfig::with_database_url(url);
    OwnerRegistryService::new(Arc::new(StoreClient::new(&config)))
}

#[tokio::test]
async fn short_identification_number_is_rejected() {
    let registry = registry_for("http://localhost:1");

    let result = registry.create(create_request("12345", "0998765432"), TOKEN).await;
    assert_matches!(result, Err(OwnerError::ValidationError(ref msg)) if msg.contains("6 characters"));
}

#[tokio::test]
async fn lowercase_identification_characters_are_rejected() {
    let registry = registry_for("http://localhost:1");

    let result = registry.create(create_request("abc1234", "0998765432"), TOKEN).await;
    assert_matches!(result, Err(OwnerError::ValidationError(_)));
}

#[tokio::test]
async fn short_phone_number_is_rejected() {
    let registry = registry_for("http://localhost:1");

    let result = registry.create(create_request("1712345678", "12-34 5"), TOKEN).await;
    assert_matches!(result, Err(OwnerError::ValidationError(ref msg)) if msg.contains("7 digits"));
}

#[tokio::test]
async fn phone_separators_do_not_count_toward_length() {
    // Seven digits spread over separators still passes
    let mock_server = MockServer::start().await;
    let registry = registry_for(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/rest/v1/owners"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::owner_row(&uuid::Uuid::new_v4().to_string(), "Carlos Mendoza Vera")
        ])))
        .mount(&mock_server)
        .await;

    let result = registry
        .create(create_request("1712345678", "099-876 5432"), TOKEN)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn missing_owner_lookup_maps_to_not_found() {
    let mock_server = MockServer::start().await;
    let registry = registry_for(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/owners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = registry.find_by_identification("1712345678", TOKEN).await;
    assert_matches!(result, Err(OwnerError::NotFound));
}
