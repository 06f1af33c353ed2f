use crate::api::attendance::{CheckInRequest, CheckOutRequest};
use crate::api::records::{DeleteRecordRequest, RecordFilter, RecordListResponse};
use crate::api::summary::SummaryQuery;
use crate::engine::aggregate::Summary;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, EmploymentType};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Time & Attendance API",
        version = "1.0.0",
        description = r#"
## Time & Attendance Tracking Service

This API powers the attendance record lifecycle for an organization: daily
clock-in/clock-out, supervisor corrections and hour rollups.

### 🔹 Key Features
- **Clocking**
  - Daily check-in and check-out with schedule comparison
  - Late arrivals past a 15-minute grace window require a justification
  - Any early departure requires a justification
  - Clock-outs without a clock-in are captured as incidents
- **Corrections**
  - Supervisors soft-delete and restore records with a full audit trail
  - At most one active record per employee and day, enforced end to end
- **Reporting**
  - Weekly/monthly hour totals against per-employment-type targets
  - Rank ordering by monthly hours

### 🔐 Security
Identity is forwarded by the gateway through `X-Actor-Id`, `X-Actor-Role`
and `X-Employee-Id` headers. Corrections and the audit trail are limited to
**Supervisor** and **Admin** roles.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for the audit list endpoint

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,

        crate::api::summary::summary,

        crate::api::records::list_records,
        crate::api::records::get_record,
        crate::api::records::delete_record,
        crate::api::records::restore_record,

        crate::api::employee::get_employee
    ),
    components(
        schemas(
            AttendanceRecord,
            Employee,
            EmploymentType,
            CheckInRequest,
            CheckOutRequest,
            DeleteRecordRequest,
            RecordFilter,
            RecordListResponse,
            SummaryQuery,
            Summary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Clocking and summary APIs"),
        (name = "Records", description = "Supervisor correction and audit APIs"),
        (name = "Employee", description = "Schedule directory lookup APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "identity_headers",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Actor-Id"))),
            );
        }
    }
}
