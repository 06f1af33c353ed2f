use actix_web::{HttpResponse, Responder, error::ErrorForbidden, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::engine::lifecycle::{self, ClockOutOutcome};
use crate::error::EngineError;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::models::Session;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Clock time. Defaults to the current server time.
    #[schema(example = "2026-08-07T09:10:00", format = "date-time", value_type = Option<String>)]
    pub timestamp: Option<NaiveDateTime>,
    /// Mandatory once the arrival is more than 15 minutes late.
    #[schema(example = "traffic jam on the ring road")]
    pub late_justification: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOutRequest {
    /// Clock time. Defaults to the current server time.
    #[schema(example = "2026-08-07T16:45:00", format = "date-time", value_type = Option<String>)]
    pub timestamp: Option<NaiveDateTime>,
    /// Mandatory for any departure before the scheduled end.
    #[schema(example = "medical appointment")]
    pub early_exit_justification: Option<String>,
    /// Mandatory when no clock-in exists for the day.
    #[schema(example = "forgot to clock in this morning")]
    pub incident_reason: Option<String>,
}

pub const RECORD_COLUMNS: &str = r#"
    id, employee_id, date, clock_in, clock_out, total_hours,
    is_late, late_reason, is_early_exit, early_exit_reason,
    has_incident, incident_reason, deleted, deleted_reason, deleted_by, deleted_at
"#;

pub async fn fetch_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> actix_web::Result<Option<Employee>> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, display_name, department, employment_type,
               scheduled_start, scheduled_end
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}

/// The single active (non-deleted) record for an employee-day, if any.
pub async fn fetch_active_record(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> actix_web::Result<Option<AttendanceRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance_records \
         WHERE employee_id = ? AND date = ? AND deleted = FALSE"
    );
    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch active record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

/// Inserts a new record and returns its id. A duplicate on the partial unique
/// key means another writer won the employee-day slot first.
async fn insert_record(pool: &MySqlPool, record: &AttendanceRecord) -> actix_web::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance_records
            (employee_id, date, clock_in, clock_out, total_hours,
             is_late, late_reason, is_early_exit, early_exit_reason,
             has_incident, incident_reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.employee_id)
    .bind(record.date)
    .bind(record.clock_in)
    .bind(record.clock_out)
    .bind(record.total_hours)
    .bind(record.is_late)
    .bind(record.late_reason.as_deref())
    .bind(record.is_early_exit)
    .bind(record.early_exit_reason.as_deref())
    .bind(record.has_incident)
    .bind(record.incident_reason.as_deref())
    .execute(pool)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_id()),
        Err(e) => {
            // Duplicate active record for the same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(EngineError::conflict("already clocked in today").into());
                }
            }

            tracing::error!(error = %e, employee_id = record.employee_id, "Insert record failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(
        content = CheckInRequest,
        description = "Optional clock time and late justification",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Clocked in, returns the opened record", body = AttendanceRecord),
        (status = 400, description = "Late arrival without a justification"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Already clocked in today"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    session: Session,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = session
        .employee_id
        .ok_or_else(|| ErrorForbidden("No employee profile"))?;

    let at = payload
        .timestamp
        .unwrap_or_else(|| Local::now().naive_local());

    let Some(employee) = fetch_employee(&pool, employee_id).await? else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    };

    let existing = fetch_active_record(&pool, employee_id, at.date()).await?;
    let mut record = lifecycle::clock_in(
        &employee,
        existing.as_ref(),
        at.date(),
        at.time(),
        payload.late_justification.as_deref(),
    )?;

    record.id = insert_record(&pool, &record).await?;
    tracing::info!(employee_id, record_id = record.id, "Clocked in");
    Ok(HttpResponse::Created().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    request_body(
        content = CheckOutRequest,
        description = "Optional clock time, early-exit justification and incident reason",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Clocked out, returns the completed record", body = AttendanceRecord),
        (status = 201, description = "No clock-in existed, an incident record was created", body = AttendanceRecord),
        (status = 400, description = "Missing mandatory justification or incident reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Already clocked out today"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    session: Session,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = session
        .employee_id
        .ok_or_else(|| ErrorForbidden("No employee profile"))?;

    let at = payload
        .timestamp
        .unwrap_or_else(|| Local::now().naive_local());

    let Some(employee) = fetch_employee(&pool, employee_id).await? else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    };

    let existing = fetch_active_record(&pool, employee_id, at.date()).await?;
    let outcome = lifecycle::clock_out(
        &employee,
        existing,
        at.date(),
        at.time(),
        payload.early_exit_justification.as_deref(),
        payload.incident_reason.as_deref(),
    )?;

    match outcome {
        ClockOutOutcome::Completed(record) => {
            let result = sqlx::query(
                r#"
                UPDATE attendance_records
                SET clock_out = ?, is_early_exit = ?, early_exit_reason = ?, total_hours = ?
                WHERE id = ?
                AND clock_out IS NULL
                AND deleted = FALSE
                "#,
            )
            .bind(record.clock_out)
            .bind(record.is_early_exit)
            .bind(record.early_exit_reason.as_deref())
            .bind(record.total_hours)
            .bind(record.id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Check-out failed");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            // Zero rows means a concurrent writer closed or removed the
            // record between our read and this update.
            if result.rows_affected() == 0 {
                return Err(EngineError::invalid_state("already clocked out today").into());
            }

            tracing::info!(employee_id, record_id = record.id, "Clocked out");
            Ok(HttpResponse::Ok().json(record))
        }
        ClockOutOutcome::Incident(mut record) => {
            record.id = insert_record(&pool, &record).await?;
            tracing::info!(employee_id, record_id = record.id, "Incident recorded");
            Ok(HttpResponse::Created().json(record))
        }
    }
}

/// Today's status endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Active record for today, or null when absent", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    session: Session,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = session
        .employee_id
        .ok_or_else(|| ErrorForbidden("No employee profile"))?;

    let today = Local::now().date_naive();
    let record = fetch_active_record(&pool, employee_id, today).await?;
    Ok(HttpResponse::Ok().json(record))
}
