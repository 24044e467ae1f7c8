use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::models::{LockoutPolicy, LockoutState};

/// Outcome of inspecting the lock before a credential check.
#[derive(Debug, Clone, PartialEq)]
pub enum LockCheck {
    /// Still inside the lockout window. No credential check happens and the
    /// counters stay as they are.
    Denied,
    /// The window has elapsed; the returned state (counters cleared) must be
    /// persisted before the credential check proceeds.
    Cleared(LockoutState),
    /// Not locked.
    Open,
}

/// Outcome of registering one failed credential check.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// This failure crossed the threshold; the returned state carries the
    /// lock and its expiry.
    LockedOut,
    /// Attempts left before the account locks.
    AttemptsRemaining(i32),
}

/// Two-state machine over the lockout counters. Every transition takes the
/// current state and the clock as inputs and returns the next state, so the
/// guard itself never touches storage.
pub struct LockoutGuard {
    policy: LockoutPolicy,
}

impl LockoutGuard {
    pub fn new() -> Self {
        Self {
            policy: LockoutPolicy::default(),
        }
    }

    pub fn with_policy(policy: LockoutPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn check(&self, state: &LockoutState, now: DateTime<Utc>) -> LockCheck {
        if !state.is_locked {
            return LockCheck::Open;
        }

        match state.locked_until {
            Some(locked_until) if now > locked_until => {
                debug!("Lockout window elapsed, clearing counters");
                LockCheck::Cleared(LockoutState::default())
            }
            _ => LockCheck::Denied,
        }
    }

    pub fn register_failure(
        &self,
        state: &LockoutState,
        now: DateTime<Utc>,
    ) -> (LockoutState, FailureOutcome) {
        let failed_attempts = state.failed_attempts + 1;

        if failed_attempts >= self.policy.max_failed_attempts {
            warn!("Failed attempt threshold reached, locking account");
            let next = LockoutState {
                failed_attempts,
                is_locked: true,
                locked_until: Some(now + Duration::minutes(self.policy.lockout_minutes)),
            };
            return (next, FailureOutcome::LockedOut);
        }

        let next = LockoutState {
            failed_attempts,
            is_locked: false,
            locked_until: None,
        };
        let remaining = self.policy.max_failed_attempts - failed_attempts;
        (next, FailureOutcome::AttemptsRemaining(remaining))
    }

    pub fn register_success(&self) -> LockoutState {
        LockoutState::default()
    }
}

impl Default for LockoutGuard {
    fn default() -> Self {
        Self::new()
    }
}
