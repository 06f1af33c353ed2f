use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary lifecycle position of a record. `deleted` is an orthogonal tag
/// tracked on the record itself, not a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Clock-in present, clock-out still missing.
    ClockedIn,
    /// Both endpoints present.
    Completed,
}

/// Daily attendance record for one employee.
///
/// At most one non-deleted record may exist per `(employee_id, date)`; the
/// storage layer backs this with a partial unique key (see `db::ensure_schema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "employee_id": 1,
        "date": "2026-08-07",
        "clock_in": "09:10:00",
        "clock_out": "16:45:00",
        "total_hours": 7.58,
        "is_late": false,
        "late_reason": null,
        "is_early_exit": true,
        "early_exit_reason": "medical appointment",
        "has_incident": false,
        "incident_reason": null,
        "deleted": false,
        "deleted_reason": null,
        "deleted_by": null,
        "deleted_at": null
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "2026-08-07", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "09:10:00", value_type = Option<String>, format = "time")]
    pub clock_in: Option<NaiveTime>,
    #[schema(example = "16:45:00", value_type = Option<String>, format = "time")]
    pub clock_out: Option<NaiveTime>,
    /// Worked hours, two decimals. Stays 0 until clock-out lands.
    #[schema(example = 7.58)]
    pub total_hours: f64,
    pub is_late: bool,
    pub late_reason: Option<String>,
    pub is_early_exit: bool,
    pub early_exit_reason: Option<String>,
    pub has_incident: bool,
    pub incident_reason: Option<String>,
    pub deleted: bool,
    pub deleted_reason: Option<String>,
    pub deleted_by: Option<u64>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub deleted_at: Option<NaiveDateTime>,
}

/// Two-decimal rounding used for stored hour totals.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

impl AttendanceRecord {
    /// Fresh record opened by a clock-in. `id` is 0 until the row is inserted.
    pub fn open(employee_id: u64, date: NaiveDate, clock_in: NaiveTime) -> Self {
        AttendanceRecord {
            id: 0,
            employee_id,
            date,
            clock_in: Some(clock_in),
            clock_out: None,
            total_hours: 0.0,
            is_late: false,
            late_reason: None,
            is_early_exit: false,
            early_exit_reason: None,
            has_incident: false,
            incident_reason: None,
            deleted: false,
            deleted_reason: None,
            deleted_by: None,
            deleted_at: None,
        }
    }

    pub fn state(&self) -> RecordState {
        if self.clock_out.is_some() {
            RecordState::Completed
        } else {
            RecordState::ClockedIn
        }
    }

    /// True while the record still waits for its clock-out.
    pub fn is_open(&self) -> bool {
        self.state() == RecordState::ClockedIn
    }

    /// Recomputes `total_hours` from the clock endpoints.
    ///
    /// Wall-clock minutes divided by 60, floored at zero so a clock-out
    /// recorded before the clock-in can never produce negative hours. Must be
    /// called whenever either endpoint changes.
    pub fn recompute_total_hours(&mut self) {
        self.total_hours = match (self.clock_in, self.clock_out) {
            (Some(clock_in), Some(clock_out)) => {
                let minutes = (clock_out - clock_in).num_minutes().max(0);
                round_hours(minutes as f64 / 60.0)
            }
            _ => 0.0,
        };
    }
}
