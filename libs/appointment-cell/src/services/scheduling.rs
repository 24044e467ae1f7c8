use chrono::{DateTime, Duration, Timelike, Utc};
use tracing::{debug, warn};

use crate::models::{Appointment, AppointmentError, ScheduleCandidate, SchedulingRules};

/// Decides whether a candidate appointment may be written. Pure logic: the
/// caller fetches the surrounding appointments and passes them in, so every
/// rule is testable without a store.
///
/// Checks run in a fixed order and the first violation wins: past-dating,
/// business hours, professional double-booking, medication requirement.
pub struct SchedulingValidator {
    rules: SchedulingRules,
}

impl SchedulingValidator {
    pub fn new() -> Self {
        Self {
            rules: SchedulingRules::default(),
        }
    }

    pub fn with_rules(rules: SchedulingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SchedulingRules {
        &self.rules
    }

    /// The slot an appointment occupies: its pre-appointment buffer plus the
    /// service duration. Half-open, so back-to-back windows do not touch.
    pub fn buffered_window(
        &self,
        scheduled_at: DateTime<Utc>,
        duration_minutes: i32,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            scheduled_at - Duration::minutes(self.rules.buffer_before_minutes),
            scheduled_at + Duration::minutes(duration_minutes as i64),
        )
    }

    pub fn validate(
        &self,
        candidate: &ScheduleCandidate,
        existing: &[Appointment],
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        debug!("Validating appointment candidate at {}", candidate.scheduled_at);

        self.check_not_stale(candidate.scheduled_at, now)?;
        self.check_business_hours(candidate.scheduled_at)?;
        self.check_no_double_booking(candidate, existing)?;
        self.check_medication_info(candidate)?;

        Ok(())
    }

    fn check_not_stale(
        &self,
        scheduled_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        if scheduled_at < now - Duration::days(self.rules.max_backdate_days) {
            warn!("Rejected stale appointment at {}", scheduled_at);
            return Err(AppointmentError::StaleSchedule(self.rules.max_backdate_days));
        }
        Ok(())
    }

    fn check_business_hours(&self, scheduled_at: DateTime<Utc>) -> Result<(), AppointmentError> {
        let hour = scheduled_at.hour();
        if hour < self.rules.open_hour || hour >= self.rules.close_hour {
            return Err(AppointmentError::OutsideBusinessHours {
                open: self.rules.open_hour,
                close: self.rules.close_hour,
            });
        }
        Ok(())
    }

    fn check_no_double_booking(
        &self,
        candidate: &ScheduleCandidate,
        existing: &[Appointment],
    ) -> Result<(), AppointmentError> {
        let professional = match &candidate.professional {
            Some(p) => p,
            None => return Ok(()),
        };

        let (window_start, window_end) =
            self.buffered_window(candidate.scheduled_at, candidate.duration_minutes);

        for other in existing {
            if candidate.exclude_id == Some(other.id) {
                continue;
            }
            if other.professional_id != Some(professional.id) {
                continue;
            }
            if !other.status.blocks_slot() {
                continue;
            }

            let (other_start, other_end) =
                self.buffered_window(other.scheduled_at, other.duration_minutes);

            if windows_overlap(window_start, window_end, other_start, other_end) {
                warn!(
                    "Double booking rejected for professional {} at {}",
                    professional.id, candidate.scheduled_at
                );
                return Err(AppointmentError::ProfessionalDoubleBooked {
                    name: professional.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn check_medication_info(&self, candidate: &ScheduleCandidate) -> Result<(), AppointmentError> {
        if !candidate.requires_medication {
            return Ok(());
        }

        let has_medication = candidate
            .medication_type
            .as_deref()
            .map(|m| !m.trim().is_empty())
            .unwrap_or(false);

        if !has_medication {
            return Err(AppointmentError::MissingMedicationInfo {
                service: candidate.service_name.clone(),
            });
        }

        Ok(())
    }
}

impl Default for SchedulingValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn windows_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}
