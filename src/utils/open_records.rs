use anyhow::Result;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::{info, warn};

/// Startup sweep over records from previous days that never received a
/// clock-out. They stay in `ClockedIn` forever unless a supervisor steps in,
/// so surface the count for operators.
pub async fn sweep_open_records(pool: &MySqlPool, today: NaiveDate) -> Result<u64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM attendance_records
        WHERE date < ?
        AND clock_out IS NULL
        AND deleted = FALSE
        "#,
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    if count > 0 {
        warn!(count, "Open attendance records left over from previous days");
    } else {
        info!("No stale open attendance records");
    }

    Ok(count as u64)
}
