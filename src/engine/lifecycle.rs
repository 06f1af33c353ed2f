use chrono::{NaiveDate, NaiveTime};

use crate::engine::schedule::{self, ClockKind};
use crate::error::EngineError;
use crate::model::attendance::{AttendanceRecord, RecordState};
use crate::model::employee::Employee;

/// Result of a clock-out request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockOutOutcome {
    /// The open record for the day, now completed.
    Completed(AttendanceRecord),
    /// No record existed for the day; an incident record was produced instead.
    /// Its `id` is 0 until the row is inserted.
    Incident(AttendanceRecord),
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Opens the day's record for an employee.
///
/// Legal only when no active record exists for `(employee, date)`. Arrivals
/// past the grace window require a non-blank justification. The returned
/// record has `id` 0 until the row is inserted.
pub fn clock_in(
    employee: &Employee,
    existing: Option<&AttendanceRecord>,
    date: NaiveDate,
    at: NaiveTime,
    justification: Option<&str>,
) -> Result<AttendanceRecord, EngineError> {
    if let Some(record) = existing {
        let detail = match record.state() {
            RecordState::ClockedIn => "already clocked in today",
            RecordState::Completed => "attendance already completed for today",
        };
        return Err(EngineError::conflict(detail));
    }

    let arrival = schedule::classify(employee.scheduled_start, at, ClockKind::Arrival);
    let justification = non_blank(justification);
    if arrival.flagged && justification.is_none() {
        return Err(EngineError::validation(format!(
            "arrival is {} minutes late, a justification is required",
            arrival.delay_minutes
        )));
    }

    let mut record = AttendanceRecord::open(employee.id, date, at);
    if arrival.flagged {
        record.is_late = true;
        record.late_reason = justification.map(str::to_owned);
    }
    Ok(record)
}

/// Closes the day's record, or records an incident when none is open.
///
/// With an open record, classifies the departure, requires a justification for
/// any early exit, and recomputes the hour total. With a completed record the
/// transition is illegal. With no record at all the request is delegated to
/// [`record_incident`].
pub fn clock_out(
    employee: &Employee,
    existing: Option<AttendanceRecord>,
    date: NaiveDate,
    at: NaiveTime,
    early_exit_justification: Option<&str>,
    incident_reason: Option<&str>,
) -> Result<ClockOutOutcome, EngineError> {
    let Some(mut record) = existing else {
        let record = record_incident(employee, date, at, incident_reason)?;
        return Ok(ClockOutOutcome::Incident(record));
    };

    if record.state() == RecordState::Completed {
        return Err(EngineError::invalid_state("already clocked out today"));
    }

    let departure = schedule::classify(employee.scheduled_end, at, ClockKind::Departure);
    let justification = non_blank(early_exit_justification);
    if departure.flagged && justification.is_none() {
        return Err(EngineError::validation(format!(
            "departure is {} minutes early, a justification is required",
            departure.delay_minutes
        )));
    }

    record.clock_out = Some(at);
    if departure.flagged {
        record.is_early_exit = true;
        record.early_exit_reason = justification.map(str::to_owned);
    }
    record.recompute_total_hours();
    Ok(ClockOutOutcome::Completed(record))
}

/// Captures a clock-out with no matching clock-in ("forgot to clock in").
///
/// The produced record carries both endpoints at the same instant, zero hours
/// and the mandatory incident reason. Its `id` is 0 until the row is inserted.
pub fn record_incident(
    employee: &Employee,
    date: NaiveDate,
    at: NaiveTime,
    reason: Option<&str>,
) -> Result<AttendanceRecord, EngineError> {
    let Some(reason) = non_blank(reason) else {
        return Err(EngineError::validation(
            "no clock-in found for today, an incident reason is required",
        ));
    };

    let mut record = AttendanceRecord::open(employee.id, date, at);
    record.clock_out = Some(at);
    record.has_incident = true;
    record.incident_reason = Some(reason.to_owned());
    record.recompute_total_hours();
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmploymentType;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    // Full-time employee on the standard 09:00-17:00 schedule.
    fn employee() -> Employee {
        Employee {
            id: 1,
            employee_code: "EMP-001".into(),
            display_name: "John Doe".into(),
            department: "Engineering".into(),
            employment_type: EmploymentType::FullTime,
            scheduled_start: t(9, 0),
            scheduled_end: t(17, 0),
        }
    }

    #[test]
    fn clock_in_on_time_opens_a_clean_record() {
        let rec = clock_in(&employee(), None, d(), t(8, 55), None).unwrap();
        assert_eq!(rec.employee_id, 1);
        assert_eq!(rec.clock_in, Some(t(8, 55)));
        assert!(!rec.is_late);
        assert!(rec.late_reason.is_none());
        assert!(rec.is_open());
    }

    #[test]
    fn clock_in_within_grace_needs_no_justification() {
        let rec = clock_in(&employee(), None, d(), t(9, 10), None).unwrap();
        assert!(!rec.is_late, "10 minutes late is inside the grace window");
    }

    #[test]
    fn late_clock_in_without_justification_is_rejected() {
        let err = clock_in(&employee(), None, d(), t(9, 16), None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn late_clock_in_with_blank_justification_is_rejected() {
        let err = clock_in(&employee(), None, d(), t(9, 30), Some("   ")).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn late_clock_in_with_justification_is_flagged_and_accepted() {
        let rec = clock_in(&employee(), None, d(), t(9, 40), Some("traffic jam")).unwrap();
        assert!(rec.is_late);
        assert_eq!(rec.late_reason.as_deref(), Some("traffic jam"));
    }

    #[test]
    fn second_clock_in_conflicts_instead_of_overwriting() {
        let first = clock_in(&employee(), None, d(), t(9, 0), None).unwrap();
        let err = clock_in(&employee(), Some(&first), d(), t(9, 5), None).unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)), "got {err:?}");
    }

    #[test]
    fn clock_in_after_completion_still_conflicts() {
        let opened = clock_in(&employee(), None, d(), t(9, 0), None).unwrap();
        let outcome = clock_out(&employee(), Some(opened), d(), t(17, 0), None, None).unwrap();
        let ClockOutOutcome::Completed(done) = outcome else {
            panic!("expected completion");
        };
        let err = clock_in(&employee(), Some(&done), d(), t(18, 0), None).unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[test]
    fn clock_out_on_schedule_completes_the_record() {
        let opened = clock_in(&employee(), None, d(), t(9, 0), None).unwrap();
        let outcome = clock_out(&employee(), Some(opened), d(), t(17, 0), None, None).unwrap();
        let ClockOutOutcome::Completed(rec) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(rec.clock_out, Some(t(17, 0)));
        assert!(!rec.is_early_exit);
        assert_eq!(rec.total_hours, 8.0);
    }

    #[test]
    fn early_exit_without_justification_is_rejected() {
        let opened = clock_in(&employee(), None, d(), t(9, 0), None).unwrap();
        let err = clock_out(&employee(), Some(opened), d(), t(16, 59), None, None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn second_clock_out_is_an_invalid_state() {
        let opened = clock_in(&employee(), None, d(), t(9, 0), None).unwrap();
        let ClockOutOutcome::Completed(done) =
            clock_out(&employee(), Some(opened), d(), t(17, 0), None, None).unwrap()
        else {
            panic!("expected completion");
        };
        let err = clock_out(&employee(), Some(done), d(), t(18, 0), None, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
    }

    #[test]
    fn clock_out_without_clock_in_produces_an_incident() {
        let outcome =
            clock_out(&employee(), None, d(), t(17, 0), None, Some("forgot to clock in")).unwrap();
        let ClockOutOutcome::Incident(rec) = outcome else {
            panic!("expected incident");
        };
        assert!(rec.has_incident);
        assert_eq!(rec.incident_reason.as_deref(), Some("forgot to clock in"));
        assert_eq!(rec.clock_in, rec.clock_out);
        assert_eq!(rec.total_hours, 0.0);
    }

    #[test]
    fn incident_without_reason_is_rejected() {
        let err = clock_out(&employee(), None, d(), t(17, 0), None, None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = record_incident(&employee(), d(), t(17, 0), Some("")).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn late_arrival_and_early_exit_flags_can_coexist() {
        let opened =
            clock_in(&employee(), None, d(), t(9, 30), Some("overslept")).unwrap();
        let ClockOutOutcome::Completed(rec) = clock_out(
            &employee(),
            Some(opened),
            d(),
            t(15, 0),
            Some("family emergency"),
            None,
        )
        .unwrap() else {
            panic!("expected completion");
        };
        assert!(rec.is_late && rec.is_early_exit);
    }

    // Full-time employee scheduled 09:00-17:00, in at 09:10, out at 16:45
    // with a justification.
    #[test]
    fn end_to_end_regular_day_with_early_exit() {
        let opened = clock_in(&employee(), None, d(), t(9, 10), None).unwrap();
        assert!(!opened.is_late);

        let ClockOutOutcome::Completed(rec) = clock_out(
            &employee(),
            Some(opened),
            d(),
            t(16, 45),
            Some("medical appointment"),
            None,
        )
        .unwrap() else {
            panic!("expected completion");
        };

        assert_eq!(rec.total_hours, 7.58);
        assert!(rec.is_early_exit);
        assert_eq!(rec.early_exit_reason.as_deref(), Some("medical appointment"));
    }
}
