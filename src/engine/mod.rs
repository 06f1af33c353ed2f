//! Attendance record lifecycle engine.
//!
//! Pure domain logic shared by every caller of the service: classification of
//! clock events against schedules, the per-day record state machine, incident
//! capture, soft deletion, and weekly/monthly aggregation. No database or
//! HTTP types in here; the `api` layer loads rows, asks this module what they
//! mean, and persists the result.

pub mod aggregate;
pub mod lifecycle;
pub mod schedule;
pub mod soft_delete;
