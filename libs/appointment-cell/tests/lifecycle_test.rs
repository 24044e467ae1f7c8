use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentError, AppointmentStatus};
use appointment_cell::services::lifecycle::{LifecycleService, StatusPatch};
use assert_matches::assert_matches;

fn appointment(status: AppointmentStatus) -> Appointment {
    let scheduled_at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
    Appointment {
        id: Uuid::new_v4(),
        pet_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        professional_id: None,
        scheduled_at,
        duration_minutes: 45,
        reason: None,
        status,
        medication_type: None,
        medication_dosage: None,
        instructions: None,
        observations: None,
        actual_start_time: None,
        actual_end_time: None,
        created_by: None,
        created_at: scheduled_at - Duration::days(2),
        updated_at: scheduled_at - Duration::days(2),
    }
}

#[test]
fn parses_the_four_known_statuses() {
    assert_eq!(
        LifecycleService::parse_status("pending").unwrap(),
        AppointmentStatus::Pending
    );
    assert_eq!(
        LifecycleService::parse_status("confirmed").unwrap(),
        AppointmentStatus::Confirmed
    );
    assert_eq!(
        LifecycleService::parse_status("completed").unwrap(),
        AppointmentStatus::Completed
    );
    assert_eq!(
        LifecycleService::parse_status("cancelled").unwrap(),
        AppointmentStatus::Cancelled
    );
}

#[test]
fn unknown_status_is_rejected() {
    let result = LifecycleService::parse_status("archived");
    assert_matches!(result, Err(AppointmentError::InvalidStatus(ref s)) if s == "archived");
}

#[test]
fn status_casing_matters() {
    assert_matches!(
        LifecycleService::parse_status("Completed"),
        Err(AppointmentError::InvalidStatus(_))
    );
}

#[test]
fn completion_fills_both_times_when_unset() {
    let appointment = appointment(AppointmentStatus::Confirmed);
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 11, 5, 0).unwrap();

    let patch = LifecycleService::completion_times(&appointment, AppointmentStatus::Completed, now);

    assert_eq!(patch.actual_end_time, Some(now));
    assert_eq!(patch.actual_start_time, Some(appointment.scheduled_at));
}

#[test]
fn completion_keeps_existing_start_time() {
    let mut appointment = appointment(AppointmentStatus::Confirmed);
    let started = Utc.with_ymd_and_hms(2025, 6, 2, 10, 12, 0).unwrap();
    appointment.actual_start_time = Some(started);

    let now = Utc.with_ymd_and_hms(2025, 6, 2, 11, 5, 0).unwrap();
    let patch = LifecycleService::completion_times(&appointment, AppointmentStatus::Completed, now);

    assert_eq!(patch.actual_end_time, Some(now));
    assert_eq!(patch.actual_start_time, None);
}

#[test]
fn recompleting_changes_nothing() {
    let mut appointment = appointment(AppointmentStatus::Completed);
    appointment.actual_start_time = Some(Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap());
    appointment.actual_end_time = Some(Utc.with_ymd_and_hms(2025, 6, 2, 10, 45, 0).unwrap());

    let later = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap();
    let patch = LifecycleService::completion_times(&appointment, AppointmentStatus::Completed, later);

    assert_eq!(patch, StatusPatch::default());
}

#[test]
fn non_completion_transitions_leave_times_alone() {
    let appointment = appointment(AppointmentStatus::Pending);
    let now = Utc::now();

    for status in [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ] {
        let patch = LifecycleService::completion_times(&appointment, status, now);
        assert_eq!(patch, StatusPatch::default());
    }
}

#[test]
fn completed_appointments_cannot_be_deleted() {
    let result = LifecycleService::ensure_deletable(AppointmentStatus::Completed);
    assert_matches!(result, Err(AppointmentError::CannotDeleteCompleted));
}

#[test]
fn other_statuses_can_be_deleted() {
    for status in [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ] {
        assert!(LifecycleService::ensure_deletable(status).is_ok());
    }
}
