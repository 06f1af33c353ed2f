use anyhow::{Context, Result};
use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

// The generated active_slot column is 1 for live rows and NULL once a row is
// soft-deleted; MySQL unique keys ignore NULLs, so the key enforces "at most
// one non-deleted record per employee-day" while keeping any number of
// deleted rows around for the audit trail.
const CREATE_EMPLOYEES: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    employee_code VARCHAR(32) NOT NULL UNIQUE,
    display_name VARCHAR(128) NOT NULL,
    department VARCHAR(64) NOT NULL,
    employment_type VARCHAR(16) NOT NULL,
    scheduled_start TIME NOT NULL,
    scheduled_end TIME NOT NULL
)
"#;

const CREATE_ATTENDANCE_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS attendance_records (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    employee_id BIGINT UNSIGNED NOT NULL,
    date DATE NOT NULL,
    clock_in TIME NULL,
    clock_out TIME NULL,
    total_hours DOUBLE NOT NULL DEFAULT 0,
    is_late BOOLEAN NOT NULL DEFAULT FALSE,
    late_reason VARCHAR(255) NULL,
    is_early_exit BOOLEAN NOT NULL DEFAULT FALSE,
    early_exit_reason VARCHAR(255) NULL,
    has_incident BOOLEAN NOT NULL DEFAULT FALSE,
    incident_reason VARCHAR(255) NULL,
    deleted BOOLEAN NOT NULL DEFAULT FALSE,
    deleted_reason VARCHAR(255) NULL,
    deleted_by BIGINT UNSIGNED NULL,
    deleted_at DATETIME NULL,
    active_slot TINYINT AS (IF(deleted, NULL, 1)) STORED,
    UNIQUE KEY uq_attendance_active_day (employee_id, date, active_slot),
    KEY idx_attendance_employee_date (employee_id, date)
)
"#;

/// Creates the schema on first start. The unique key on
/// `(employee_id, date, active_slot)` is the storage-level backstop for the
/// one-active-record-per-day rule; application logic checks it too, but two
/// racing clock-ins resolve here to one success and one duplicate-key error.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(CREATE_EMPLOYEES)
        .execute(pool)
        .await
        .context("Failed to create employees table")?;

    sqlx::query(CREATE_ATTENDANCE_RECORDS)
        .execute(pool)
        .await
        .context("Failed to create attendance_records table")?;

    Ok(())
}
