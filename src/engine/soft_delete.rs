use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::model::attendance::AttendanceRecord;

/// Marks a record as deleted, capturing who removed it, when and why.
///
/// Legal from any non-deleted state. The row is retained for audit and the
/// employee-day slot becomes free for a new active record. `at` is the time
/// of the deletion itself, not of the original record.
pub fn delete(
    record: &AttendanceRecord,
    reason: &str,
    actor_id: u64,
    at: NaiveDateTime,
) -> Result<AttendanceRecord, EngineError> {
    if record.deleted {
        return Err(EngineError::invalid_state("record is already deleted"));
    }
    if reason.trim().is_empty() {
        return Err(EngineError::validation("a deletion reason is required"));
    }

    let mut deleted = record.clone();
    deleted.deleted = true;
    deleted.deleted_reason = Some(reason.trim().to_owned());
    deleted.deleted_by = Some(actor_id);
    deleted.deleted_at = Some(at);
    Ok(deleted)
}

/// Brings a deleted record back into the active set.
///
/// `active_for_day` is the current active record for the same employee-day,
/// if any; restoring over it would re-violate the one-active-record rule, so
/// the caller must delete or resolve that record first.
pub fn restore(
    record: &AttendanceRecord,
    active_for_day: Option<&AttendanceRecord>,
) -> Result<AttendanceRecord, EngineError> {
    if !record.deleted {
        return Err(EngineError::invalid_state("record is not deleted"));
    }
    if active_for_day.is_some() {
        return Err(EngineError::conflict(format!(
            "an active record already exists for employee {} on {}",
            record.employee_id, record.date
        )));
    }

    let mut restored = record.clone();
    restored.deleted = false;
    restored.deleted_reason = None;
    restored.deleted_by = None;
    restored.deleted_at = None;
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 7)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn record() -> AttendanceRecord {
        let mut rec = AttendanceRecord::open(
            7,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        rec.id = 42;
        rec.clock_out = Some(NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        rec.recompute_total_hours();
        rec
    }

    #[test]
    fn delete_captures_audit_metadata() {
        let rec = record();
        let deleted = delete(&rec, "duplicate entry", 99, now()).unwrap();
        assert!(deleted.deleted);
        assert_eq!(deleted.deleted_reason.as_deref(), Some("duplicate entry"));
        assert_eq!(deleted.deleted_by, Some(99));
        assert_eq!(deleted.deleted_at, Some(now()));
        // the underlying attendance data is untouched
        assert_eq!(deleted.total_hours, rec.total_hours);
        assert_eq!(deleted.clock_in, rec.clock_in);
    }

    #[test]
    fn delete_requires_a_reason() {
        let err = delete(&record(), "  ", 99, now()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn delete_of_a_deleted_record_is_rejected() {
        let deleted = delete(&record(), "duplicate entry", 99, now()).unwrap();
        let err = delete(&deleted, "again", 99, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)), "got {err:?}");
    }

    #[test]
    fn restore_round_trips_to_the_pre_delete_state() {
        let rec = record();
        let deleted = delete(&rec, "entered against wrong day", 99, now()).unwrap();
        let restored = restore(&deleted, None).unwrap();
        assert_eq!(restored, rec);
    }

    #[test]
    fn restore_of_an_active_record_is_rejected() {
        let err = restore(&record(), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn restore_conflicts_when_the_slot_is_occupied() {
        let deleted = delete(&record(), "duplicate entry", 99, now()).unwrap();
        // a replacement record was created for the same employee-day
        let mut replacement = record();
        replacement.id = 43;
        let err = restore(&deleted, Some(&replacement)).unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)), "got {err:?}");
    }
}
