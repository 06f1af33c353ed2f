use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::api::attendance::fetch_employee;
use crate::model::employee::Employee;
use crate::models::Session;

/// Employee schedule lookup endpoint
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "ID of the employee to fetch")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    security(
        ("identity_headers" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    _session: Session,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    match fetch_employee(&pool, employee_id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        }))),
    }
}
