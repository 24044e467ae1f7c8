use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
    pub database_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: "http://localhost:54321".to_string(),
            database_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            database_api_key: self.database_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn with_database_url(url: &str) -> AppConfig {
        let mut config = TestConfig::default().to_app_config();
        config.database_url = url.to_string();
        config
    }
}

pub struct TestUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: "reception".to_string(),
            role: "staff".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(username: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: role.to_string(),
        }
    }

    pub fn staff(username: &str) -> Self {
        Self::new(username, "staff")
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: Some(self.username.clone()),
            email: None,
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token(
            &user.id,
            &user.username,
            &user.role,
            "access",
            secret,
            Duration::hours(exp_hours.unwrap_or(24)),
        )
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        issue_token(
            &user.id,
            &user.username,
            &user.role,
            "access",
            secret,
            Duration::hours(-1),
        )
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST rows for wiremock-backed tests.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn staff_user_row(
        id: &str,
        username: &str,
        password_hash: &str,
        failed_attempts: i32,
        is_locked: bool,
        locked_until: Option<DateTime<Utc>>,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{}@clinic.example", username),
            "full_name": "Test Staffer",
            "role": "staff",
            "password_hash": password_hash,
            "failed_login_attempts": failed_attempts,
            "is_locked": is_locked,
            "locked_until": locked_until,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn owner_row(id: &str, full_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "identification_type": "cedula",
            "identification_number": "1712345678",
            "address": "Av. Amazonas N24-03",
            "phone": "0998765432",
            "email": null,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn pet_row(id: &str, name: &str, owner_id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "species": "canine",
            "breed": "Labrador",
            "birth_date": "2022-03-15",
            "gender": "M",
            "color": "Golden",
            "weight": 24.5,
            "allergies": "",
            "medical_conditions": "",
            "additional_notes": "",
            "owner_id": owner_id,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn service_row(id: &str, name: &str, requires_medication: bool) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "service_type": if requires_medication { "medicated_bath" } else { "normal_bath" },
            "description": "",
            "duration_minutes": 60,
            "price": 25.0,
            "requires_medication": requires_medication,
            "default_instructions": "",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn professional_row(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "specialties": ["grooming"],
            "phone": "",
            "email": "",
            "is_active": true
        })
    }

    pub fn appointment_row(
        id: &str,
        pet_id: &str,
        service_id: &str,
        professional_id: Option<&str>,
        scheduled_at: DateTime<Utc>,
        duration_minutes: i32,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "pet_id": pet_id,
            "service_id": service_id,
            "professional_id": professional_id,
            "scheduled_at": scheduled_at,
            "duration_minutes": duration_minutes,
            "reason": "",
            "status": status,
            "medication_type": null,
            "medication_dosage": null,
            "instructions": null,
            "observations": null,
            "actual_start_time": null,
            "actual_end_time": null,
            "created_by": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.database_url, "http://localhost:54321");
        assert_eq!(app_config.database_api_key, "test-api-key");
        assert!(!app_config.jwt_secret.is_empty());
    }

    #[test]
    fn test_token_round_trip() {
        let config = TestConfig::default();
        let user = TestUser::admin("clinic-admin");
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        let validated = validate_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(validated.id, user.id);
        assert_eq!(validated.username, Some(user.username.clone()));
        assert_eq!(validated.role, Some(user.role.clone()));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = TestConfig::default();
        let user = TestUser::default();
        let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

        assert!(validate_token(&token, &config.jwt_secret).is_err());
    }
}
