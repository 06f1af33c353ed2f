use actix_web::{HttpResponse, Responder, error::ErrorForbidden, web};
use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::{RECORD_COLUMNS, fetch_employee};
use crate::config::Config;
use crate::engine::aggregate::{self, Summary};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::models::Session;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = "2026-08-07", format = "date", value_type = Option<String>)]
    /// Day anchoring the week/month windows. Defaults to today.
    pub reference_date: Option<NaiveDate>,
    #[schema(example = 123)]
    /// Restrict to one employee. Employees are always restricted to themselves.
    pub employee_id: Option<u64>,
}

/// Hours summary endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Per-employee weekly/monthly totals, rank ordered", body = [Summary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Attendance"
)]
pub async fn summary(
    session: Session,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    // Employees only ever see their own numbers; supervisors may pick one
    // employee or omit the filter for everyone.
    let employee_filter = if session.is_employee() {
        let own_id = session
            .employee_id
            .ok_or_else(|| ErrorForbidden("No employee profile"))?;
        if query.employee_id.is_some_and(|id| id != own_id) {
            return Err(ErrorForbidden("Employees may only query their own summary"));
        }
        Some(own_id)
    } else {
        query.employee_id
    };

    let reference = query
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    // Fetch the union of the week and month windows; the week around the
    // reference day may spill into the neighbouring month.
    let week = reference.week(Weekday::Mon);
    let month_start = reference.with_day0(0).unwrap_or(reference);
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(reference);
    let from = week.first_day().min(month_start);
    let to = week.last_day().max(month_end);

    let employees: Vec<Employee> = match employee_filter {
        Some(id) => match fetch_employee(&pool, id).await? {
            Some(employee) => vec![employee],
            None => {
                return Ok(HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Employee not found"
                })));
            }
        },
        None => sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_code, display_name, department, employment_type,
                   scheduled_start, scheduled_end
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?,
    };

    let mut records_sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance_records \
         WHERE deleted = FALSE AND date >= ? AND date <= ?"
    );
    if employee_filter.is_some() {
        records_sql.push_str(" AND employee_id = ?");
    }

    let mut records_q = sqlx::query_as::<_, AttendanceRecord>(&records_sql)
        .bind(from)
        .bind(to);
    if let Some(id) = employee_filter {
        records_q = records_q.bind(id);
    }

    let records = records_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch records for summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let summaries: Vec<Summary> =
        aggregate::summarize(&records, &employees, reference, &config.targets);
    Ok(HttpResponse::Ok().json(summaries))
}
