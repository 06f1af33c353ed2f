use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::{RECORD_COLUMNS, fetch_active_record};
use crate::engine::soft_delete;
use crate::error::EngineError;
use crate::model::attendance::AttendanceRecord;
use crate::models::Session;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRecordRequest {
    /// Why the record is being withdrawn. Mandatory.
    #[schema(example = "duplicate entry for the same day")]
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecordFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "2026-08-01", format = "date", value_type = Option<String>)]
    /// Earliest record date, inclusive
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-08-31", format = "date", value_type = Option<String>)]
    /// Latest record date, inclusive
    pub to: Option<NaiveDate>,
    #[schema(example = false)]
    /// Include soft-deleted records (audit view)
    pub include_deleted: Option<bool>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct RecordListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/// Any record by id, deleted ones included. The ledger keeps deleted rows
/// queryable for audit.
async fn fetch_record(
    pool: &MySqlPool,
    record_id: u64,
) -> actix_web::Result<Option<AttendanceRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM attendance_records WHERE id = ?");
    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(record_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, record_id, "Failed to fetch record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

/// Record detail endpoint (audit view)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/records/{record_id}",
    params(
        ("record_id" = u64, Path, description = "ID of the attendance record")
    ),
    responses(
        (status = 200, description = "Record found", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Record not found")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Records"
)]
pub async fn get_record(
    session: Session,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_supervisor()?;

    match fetch_record(&pool, path.into_inner()).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Record not found"
        }))),
    }
}

/// Soft-delete endpoint (supervisor)
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/records/{record_id}",
    params(
        ("record_id" = u64, Path, description = "ID of the attendance record to delete")
    ),
    request_body(
        content = DeleteRecordRequest,
        description = "Mandatory deletion reason",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Record soft-deleted", body = Object, example = json!({
            "message": "Record deleted"
        })),
        (status = 400, description = "Missing deletion reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Record is already deleted")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Records"
)]
pub async fn delete_record(
    session: Session,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DeleteRecordRequest>,
) -> actix_web::Result<impl Responder> {
    session.require_supervisor()?;

    let record_id = path.into_inner();
    let Some(record) = fetch_record(&pool, record_id).await? else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Record not found"
        })));
    };

    let deleted = soft_delete::delete(
        &record,
        &payload.reason,
        session.actor_id,
        Local::now().naive_local(),
    )?;

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET deleted = TRUE, deleted_reason = ?, deleted_by = ?, deleted_at = ?
        WHERE id = ?
        AND deleted = FALSE
        "#,
    )
    .bind(deleted.deleted_reason.as_deref())
    .bind(deleted.deleted_by)
    .bind(deleted.deleted_at)
    .bind(record_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, record_id, "Delete record failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Err(EngineError::invalid_state("record is already deleted").into());
    }

    tracing::info!(record_id, actor_id = session.actor_id, "Record soft-deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Record deleted"
    })))
}

/// Restore endpoint (supervisor)
#[utoipa::path(
    post,
    path = "/api/v1/attendance/records/{record_id}/restore",
    params(
        ("record_id" = u64, Path, description = "ID of the attendance record to restore")
    ),
    responses(
        (status = 200, description = "Record restored", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "An active record already occupies the employee-day"),
        (status = 422, description = "Record is not deleted")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Records"
)]
pub async fn restore_record(
    session: Session,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    session.require_supervisor()?;

    let record_id = path.into_inner();
    let Some(record) = fetch_record(&pool, record_id).await? else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Record not found"
        })));
    };

    let occupant = fetch_active_record(&pool, record.employee_id, record.date).await?;
    let restored = soft_delete::restore(&record, occupant.as_ref())?;

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET deleted = FALSE, deleted_reason = NULL, deleted_by = NULL, deleted_at = NULL
        WHERE id = ?
        AND deleted = TRUE
        "#,
    )
    .bind(record_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            Err(EngineError::invalid_state("record is not deleted").into())
        }
        Ok(_) => {
            tracing::info!(record_id, actor_id = session.actor_id, "Record restored");
            Ok(HttpResponse::Ok().json(restored))
        }
        Err(e) => {
            // The partial unique key caught a restore racing a new clock-in
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(EngineError::conflict(
                        "an active record already exists for that employee-day",
                    )
                    .into());
                }
            }

            tracing::error!(error = %e, record_id, "Restore record failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Audit list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/records",
    params(RecordFilter),
    responses(
        (status = 200, description = "Paginated record list", body = RecordListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Records"
)]
pub async fn list_records(
    session: Session,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordFilter>,
) -> actix_web::Result<impl Responder> {
    session.require_supervisor()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(from) = query.from {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    if !query.include_deleted.unwrap_or(false) {
        where_sql.push_str(" AND deleted = FALSE");
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM attendance_records{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance_records{} \
         ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch record list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let response = RecordListResponse {
        data: records,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
