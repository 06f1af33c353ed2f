use chrono::{NaiveTime, Timelike};

/// Grace window for arrivals. Up to this many minutes late is still on time.
pub const LATE_GRACE_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    Arrival,
    Departure,
}

/// Outcome of comparing an actual clock time against the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Signed magnitude in minutes. Positive means "worse than scheduled":
    /// arrived later, or left earlier.
    pub delay_minutes: i64,
    /// Whether the event crosses the threshold that makes a justification
    /// mandatory.
    pub flagged: bool,
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Classifies a clock event against the scheduled time.
///
/// Arrivals are flagged only when more than [`LATE_GRACE_MINUTES`] late;
/// departures are flagged on any early exit, however small. The asymmetry is
/// intentional and mirrors the established attendance policy (see DESIGN.md).
/// Both timestamps are assumed to fall on the same calendar day; overnight
/// shifts are out of scope.
pub fn classify(scheduled: NaiveTime, actual: NaiveTime, kind: ClockKind) -> Classification {
    let scheduled_minutes = minutes_of_day(scheduled);
    let actual_minutes = minutes_of_day(actual);

    match kind {
        ClockKind::Arrival => {
            let delay_minutes = actual_minutes - scheduled_minutes;
            Classification {
                delay_minutes,
                flagged: delay_minutes > LATE_GRACE_MINUTES,
            }
        }
        ClockKind::Departure => {
            // Positive means leaving early.
            let delay_minutes = scheduled_minutes - actual_minutes;
            Classification {
                delay_minutes,
                flagged: delay_minutes > 0,
            }
        }
    }
}
