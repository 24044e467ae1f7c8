use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{
    Appointment, AppointmentError, AppointmentStatus, ProfessionalRef, ScheduleCandidate,
    SchedulingRules,
};
use appointment_cell::services::scheduling::SchedulingValidator;
use assert_matches::assert_matches;

fn now() -> DateTime<Utc> {
    // A Monday at noon, well inside business hours
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    // Same day as `now`
    Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
}

fn professional() -> ProfessionalRef {
    ProfessionalRef {
        id: Uuid::new_v4(),
        name: "Dra. Morales".to_string(),
    }
}

fn candidate(scheduled_at: DateTime<Utc>, professional: Option<ProfessionalRef>) -> ScheduleCandidate {
    ScheduleCandidate {
        scheduled_at,
        duration_minutes: 60,
        professional,
        service_name: "Grooming".to_string(),
        requires_medication: false,
        medication_type: None,
        exclude_id: None,
    }
}

fn existing_appointment(
    professional_id: Uuid,
    scheduled_at: DateTime<Utc>,
    duration_minutes: i32,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        pet_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        professional_id: Some(professional_id),
        scheduled_at,
        duration_minutes,
        reason: None,
        status,
        medication_type: None,
        medication_dosage: None,
        instructions: None,
        observations: None,
        actual_start_time: None,
        actual_end_time: None,
        created_by: None,
        created_at: scheduled_at - Duration::days(1),
        updated_at: scheduled_at - Duration::days(1),
    }
}

#[test]
fn accepts_plain_candidate_inside_hours() {
    let validator = SchedulingValidator::new();
    let result = validator.validate(&candidate(at(10, 0), None), &[], now());
    assert!(result.is_ok());
}

#[test]
fn rejects_candidate_older_than_one_day() {
    let validator = SchedulingValidator::new();
    let stale = now() - Duration::hours(25);

    let result = validator.validate(&candidate(stale, None), &[], now());
    assert_matches!(result, Err(AppointmentError::StaleSchedule(1)));
}

#[test]
fn stale_check_wins_over_every_other_rule() {
    // Stale, outside business hours, double-booked and missing medication
    // all at once: the first check decides the reason.
    let validator = SchedulingValidator::new();
    let professional = professional();
    let stale = now() - Duration::days(3);

    let mut cand = candidate(stale, Some(professional.clone()));
    cand.requires_medication = true;
    let existing = vec![existing_appointment(
        professional.id,
        stale,
        60,
        AppointmentStatus::Confirmed,
    )];

    let result = validator.validate(&cand, &existing, now());
    assert_matches!(result, Err(AppointmentError::StaleSchedule(_)));
}

#[test]
fn allows_recent_past_within_backdate_window() {
    // Two hours ago is within the one-day grace period
    let validator = SchedulingValidator::new();
    let result = validator.validate(&candidate(at(10, 0), None), &[], at(12, 0));
    assert!(result.is_ok());
}

#[test]
fn rejects_before_opening_hour() {
    let validator = SchedulingValidator::new();
    let result = validator.validate(&candidate(at(7, 59), None), &[], now());
    assert_matches!(
        result,
        Err(AppointmentError::OutsideBusinessHours { open: 8, close: 16 })
    );
}

#[test]
fn accepts_at_opening_hour() {
    let validator = SchedulingValidator::new();
    assert!(validator.validate(&candidate(at(8, 0), None), &[], now()).is_ok());
}

#[test]
fn accepts_last_hour_before_close() {
    let validator = SchedulingValidator::new();
    assert!(validator.validate(&candidate(at(15, 59), None), &[], now()).is_ok());
}

#[test]
fn rejects_at_closing_hour() {
    let validator = SchedulingValidator::new();
    let result = validator.validate(&candidate(at(16, 0), None), &[], now());
    assert_matches!(result, Err(AppointmentError::OutsideBusinessHours { .. }));
}

#[test]
fn custom_rules_shift_the_opening_range() {
    let validator = SchedulingValidator::with_rules(SchedulingRules {
        open_hour: 8,
        close_hour: 18,
        ..SchedulingRules::default()
    });

    assert!(validator.validate(&candidate(at(17, 0), None), &[], now()).is_ok());
}

#[test]
fn rejects_half_hour_overlap_for_same_professional() {
    // Confirmed appointment at 10:00 for 60 minutes; a new one at 10:30
    // for the same professional must be refused.
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![existing_appointment(
        professional.id,
        at(10, 0),
        60,
        AppointmentStatus::Confirmed,
    )];

    let result = validator.validate(&candidate(at(10, 30), Some(professional)), &existing, now());
    assert_matches!(
        result,
        Err(AppointmentError::ProfessionalDoubleBooked { ref name }) if name == "Dra. Morales"
    );
}

#[test]
fn rejection_message_names_the_professional() {
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![existing_appointment(
        professional.id,
        at(10, 0),
        60,
        AppointmentStatus::Pending,
    )];

    let err = validator
        .validate(&candidate(at(10, 30), Some(professional)), &existing, now())
        .unwrap_err();
    assert!(err.to_string().contains("Dra. Morales"));
}

#[test]
fn pre_buffer_blocks_back_to_back_bookings() {
    // Existing 10:00-11:00. A new 11:30 start sits inside the hour-long
    // pre-buffer that trails the existing window.
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![existing_appointment(
        professional.id,
        at(10, 0),
        60,
        AppointmentStatus::Confirmed,
    )];

    let result = validator.validate(&candidate(at(11, 30), Some(professional)), &existing, now());
    assert_matches!(result, Err(AppointmentError::ProfessionalDoubleBooked { .. }));
}

#[test]
fn accepts_slot_clear_of_buffered_windows() {
    // 12:00 start: buffered window [11:00, 13:00) no longer touches the
    // existing [9:00, 11:00) window.
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![existing_appointment(
        professional.id,
        at(10, 0),
        60,
        AppointmentStatus::Confirmed,
    )];

    let result = validator.validate(&candidate(at(12, 0), Some(professional)), &existing, now());
    assert!(result.is_ok());
}

#[test]
fn cancelled_and_completed_appointments_do_not_block() {
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![
        existing_appointment(professional.id, at(10, 0), 60, AppointmentStatus::Cancelled),
        existing_appointment(professional.id, at(10, 0), 60, AppointmentStatus::Completed),
    ];

    let result = validator.validate(&candidate(at(10, 30), Some(professional)), &existing, now());
    assert!(result.is_ok());
}

#[test]
fn excluded_appointment_does_not_conflict_with_itself() {
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = existing_appointment(professional.id, at(10, 0), 60, AppointmentStatus::Confirmed);

    let mut cand = candidate(at(10, 30), Some(professional));
    cand.exclude_id = Some(existing.id);

    let result = validator.validate(&cand, &[existing], now());
    assert!(result.is_ok());
}

#[test]
fn no_professional_means_no_overlap_check() {
    let validator = SchedulingValidator::new();
    let other = professional();
    let existing = vec![existing_appointment(
        other.id,
        at(10, 0),
        60,
        AppointmentStatus::Confirmed,
    )];

    let result = validator.validate(&candidate(at(10, 30), None), &existing, now());
    assert!(result.is_ok());
}

#[test]
fn medicated_service_requires_medication_type() {
    let validator = SchedulingValidator::new();

    let mut cand = candidate(at(10, 0), None);
    cand.service_name = "Medicated bath".to_string();
    cand.requires_medication = true;

    let result = validator.validate(&cand, &[], now());
    assert_matches!(
        result,
        Err(AppointmentError::MissingMedicationInfo { ref service }) if service == "Medicated bath"
    );
}

#[test]
fn whitespace_medication_type_counts_as_missing() {
    let validator = SchedulingValidator::new();

    let mut cand = candidate(at(10, 0), None);
    cand.requires_medication = true;
    cand.medication_type = Some("   ".to_string());

    let result = validator.validate(&cand, &[], now());
    assert_matches!(result, Err(AppointmentError::MissingMedicationInfo { .. }));
}

#[test]
fn medicated_service_accepts_supplied_medication() {
    let validator = SchedulingValidator::new();

    let mut cand = candidate(at(10, 0), None);
    cand.requires_medication = true;
    cand.medication_type = Some("Chlorhexidine".to_string());

    assert!(validator.validate(&cand, &[], now()).is_ok());
}

#[test]
fn double_booking_checked_before_medication() {
    let validator = SchedulingValidator::new();
    let professional = professional();
    let existing = vec![existing_appointment(
        professional.id,
        at(10, 0),
        60,
        AppointmentStatus::Confirmed,
    )];

    let mut cand = candidate(at(10, 30), Some(professional));
    cand.requires_medication = true;

    let result = validator.validate(&cand, &existing, now());
    assert_matches!(result, Err(AppointmentError::ProfessionalDoubleBooked { .. }));
}
