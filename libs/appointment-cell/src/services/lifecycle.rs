use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// Timestamps to write alongside a status change. `None` means leave the
/// column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusPatch {
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
}

pub struct LifecycleService;

impl LifecycleService {
    /// The status endpoint accepts raw strings; anything outside the four
    /// known statuses is an invalid-status rejection, not a parse crash.
    pub fn parse_status(raw: &str) -> Result<AppointmentStatus, AppointmentError> {
        match raw {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(AppointmentError::InvalidStatus(other.to_string())),
        }
    }

    /// Auto-filled times when an appointment is marked completed:
    /// `actual_end_time = now` when unset, and `actual_start_time` falls back
    /// to the scheduled time when the end was just set. Re-completing an
    /// appointment that already has an end time changes nothing.
    pub fn completion_times(
        appointment: &Appointment,
        new_status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> StatusPatch {
        if new_status != AppointmentStatus::Completed {
            return StatusPatch::default();
        }

        if appointment.actual_end_time.is_some() {
            debug!("Appointment {} already has an end time, leaving as-is", appointment.id);
            return StatusPatch::default();
        }

        StatusPatch {
            actual_end_time: Some(now),
            actual_start_time: if appointment.actual_start_time.is_none() {
                Some(appointment.scheduled_at)
            } else {
                None
            },
        }
    }

    /// Completed appointments are part of the clinical record and stay.
    pub fn ensure_deletable(status: AppointmentStatus) -> Result<(), AppointmentError> {
        if status == AppointmentStatus::Completed {
            return Err(AppointmentError::CannotDeleteCompleted);
        }
        Ok(())
    }
}
