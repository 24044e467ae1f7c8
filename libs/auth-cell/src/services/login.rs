use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_utils::jwt::issue_token_pair;

use crate::models::{
    AuthError, LockoutState, LoginRequest, LoginResponse, LoginUser, StaffUser,
};
use crate::services::lockout::{FailureOutcome, LockCheck, LockoutGuard};
use crate::services::password::verify_password;

/// Composes the lockout guard with the credential store: lookup, lock check,
/// password verification, counter persistence, token issuance. One read and
/// at most one write per attempt.
pub struct LoginService {
    store: Arc<StoreClient>,
    guard: LockoutGuard,
    jwt_secret: String,
}

impl LoginService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(StoreClient::new(config)),
            guard: LockoutGuard::new(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        debug!("Login attempt for {}", request.username);

        // Unknown usernames mutate nothing
        let user = self.lookup(&request.username).await?;
        let mut state = user.lockout_state();
        let now = Utc::now();

        match self.guard.check(&state, now) {
            LockCheck::Denied => {
                info!("Login rejected, account {} is locked", user.username);
                return Err(AuthError::AccountLocked);
            }
            LockCheck::Cleared(fresh) => {
                // Lock expired: persist the cleared counters, then fall
                // through to the credential check in this same request
                self.persist_lockout_state(user.id, &fresh).await?;
                state = fresh;
            }
            LockCheck::Open => {}
        }

        let password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AuthError::DatabaseError(format!("Password verification failed: {}", e)))?;

        if password_valid {
            self.persist_lockout_state(user.id, &self.guard.register_success())
                .await?;

            let tokens = issue_token_pair(
                &user.id.to_string(),
                &user.username,
                user.role.as_str(),
                &self.jwt_secret,
            );

            info!("Login successful for {}", user.username);
            return Ok(LoginResponse {
                message: "Login successful".to_string(),
                user: LoginUser {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                    full_name: user.full_name,
                    role: user.role,
                },
                access: tokens.access,
                refresh: tokens.refresh,
            });
        }

        let (next, outcome) = self.guard.register_failure(&state, now);
        self.persist_lockout_state(user.id, &next).await?;

        match outcome {
            FailureOutcome::LockedOut => {
                warn!("Account {} locked after repeated failures", user.username);
                Err(AuthError::AccountLockedNow)
            }
            FailureOutcome::AttemptsRemaining(remaining) => {
                Err(AuthError::InvalidCredentials { remaining })
            }
        }
    }

    async fn lookup(&self, username: &str) -> Result<StaffUser, AuthError> {
        let path = format!(
            "/rest/v1/staff_users?username=eq.{}&limit=1",
            urlencoding::encode(username)
        );

        let result: Vec<StaffUser> = self
            .store
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(AuthError::UserNotFound)
    }

    async fn persist_lockout_state(
        &self,
        user_id: Uuid,
        state: &LockoutState,
    ) -> Result<(), AuthError> {
        let path = format!("/rest/v1/staff_users?id=eq.{}", user_id);
        let body = json!({
            "failed_login_attempts": state.failed_attempts,
            "is_locked": state.is_locked,
            "locked_until": state.locked_until,
        });

        self.store
            .execute(Method::PATCH, &path, None, Some(body))
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }
}
