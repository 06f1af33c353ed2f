use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Employment category, drives the weekly/monthly hour targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display, ToSchema,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
}

/// Schedule-directory row. Owned by personnel management; the attendance
/// engine only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "display_name": "John Doe",
        "department": "Engineering",
        "employment_type": "full_time",
        "scheduled_start": "09:00:00",
        "scheduled_end": "17:00:00"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "John Doe")]
    pub display_name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "full_time")]
    pub employment_type: EmploymentType,

    /// Scheduled start of the working day.
    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub scheduled_start: NaiveTime,

    /// Scheduled end of the working day.
    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub scheduled_end: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn employment_type_parses_snake_case() {
        assert_eq!(
            EmploymentType::from_str("full_time").unwrap(),
            EmploymentType::FullTime
        );
        assert_eq!(
            EmploymentType::from_str("part_time").unwrap(),
            EmploymentType::PartTime
        );
        assert!(EmploymentType::from_str("contractor").is_err());
    }
}
