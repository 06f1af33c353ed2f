use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, round_hours};
use crate::model::employee::{Employee, EmploymentType};

/// Weekly/monthly hour targets per employment type.
///
/// Policy constants rather than invariants; `Config::from_env` exposes env
/// overrides for all four.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourTargets {
    pub full_time_week: f64,
    pub full_time_month: f64,
    pub part_time_week: f64,
    pub part_time_month: f64,
}

impl Default for HourTargets {
    fn default() -> Self {
        HourTargets {
            full_time_week: 48.0,
            full_time_month: 192.0,
            part_time_week: 24.0,
            part_time_month: 96.0,
        }
    }
}

impl HourTargets {
    pub fn week_for(&self, employment_type: EmploymentType) -> f64 {
        match employment_type {
            EmploymentType::FullTime => self.full_time_week,
            EmploymentType::PartTime => self.part_time_week,
        }
    }

    pub fn month_for(&self, employment_type: EmploymentType) -> f64 {
        match employment_type {
            EmploymentType::FullTime => self.full_time_month,
            EmploymentType::PartTime => self.part_time_month,
        }
    }
}

/// Aggregated hours for one employee, display-rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1,
        "week_hours": 32.5,
        "month_hours": 150.2,
        "week_target": 48.0,
        "month_target": 192.0,
        "rank": 1
    })
)]
pub struct Summary {
    pub employee_id: u64,
    pub week_hours: f64,
    pub month_hours: f64,
    pub week_target: f64,
    pub month_target: f64,
    /// 1-based position by descending monthly hours, ties kept in input order.
    pub rank: u32,
}

fn round_display(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Rolls active records up into per-employee weekly/monthly totals.
///
/// The week window is Monday through Sunday of the ISO week containing
/// `reference`; the month window is the calendar month containing it. Deleted
/// records never contribute, whatever the caller passed in. Records for
/// employees absent from `employees` are skipped since their targets are
/// unknown. The result comes back rank-ordered, one entry per employee.
pub fn summarize(
    records: &[AttendanceRecord],
    employees: &[Employee],
    reference: NaiveDate,
    targets: &HourTargets,
) -> Vec<Summary> {
    let week = reference.week(Weekday::Mon);

    // (week, month) totals at full 2-decimal precision, in employee order.
    let mut totals = vec![(0.0_f64, 0.0_f64); employees.len()];
    for (idx, employee) in employees.iter().enumerate() {
        for record in records {
            if record.deleted || record.employee_id != employee.id {
                continue;
            }
            if record.date >= week.first_day() && record.date <= week.last_day() {
                totals[idx].0 += record.total_hours;
            }
            if record.date.year() == reference.year() && record.date.month() == reference.month() {
                totals[idx].1 += record.total_hours;
            }
        }
        totals[idx].0 = round_hours(totals[idx].0);
        totals[idx].1 = round_hours(totals[idx].1);
    }

    // Stable sort keeps ties in input order.
    let mut order: Vec<usize> = (0..employees.len()).collect();
    order.sort_by(|&a, &b| {
        totals[b]
            .1
            .partial_cmp(&totals[a].1)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    order
        .iter()
        .enumerate()
        .map(|(position, &idx)| {
            let employee = &employees[idx];
            let (week_hours, month_hours) = totals[idx];
            Summary {
                employee_id: employee.id,
                week_hours: round_display(week_hours),
                month_hours: round_display(month_hours),
                week_target: targets.week_for(employee.employment_type),
                month_target: targets.month_for(employee.employment_type),
                rank: position as u32 + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: u64, employment_type: EmploymentType) -> Employee {
        Employee {
            id,
            employee_code: format!("EMP-{id:03}"),
            display_name: format!("Employee {id}"),
            department: "Engineering".into(),
            employment_type,
            scheduled_start: t(9, 0),
            scheduled_end: t(17, 0),
        }
    }

    fn completed(employee_id: u64, date: NaiveDate, hours: f64) -> AttendanceRecord {
        let mut rec = AttendanceRecord::open(employee_id, date, t(9, 0));
        rec.clock_out = Some(t(9, 0) + chrono::Duration::minutes((hours * 60.0).round() as i64));
        rec.recompute_total_hours();
        rec
    }

    // 2026-08-07 is a Friday; its ISO week runs Mon 08-03 .. Sun 08-09.
    const REF: (i32, u32, u32) = (2026, 8, 7);

    fn reference() -> NaiveDate {
        day(REF.0, REF.1, REF.2)
    }

    #[test]
    fn deleted_records_do_not_contribute() {
        let employees = [employee(1, EmploymentType::FullTime)];
        let mut dropped = completed(1, day(2026, 8, 5), 8.0);
        dropped.deleted = true;
        let records = [
            completed(1, day(2026, 8, 3), 8.0),
            completed(1, day(2026, 8, 4), 8.0),
            dropped,
        ];

        let summaries = summarize(&records, &employees, reference(), &HourTargets::default());
        assert_eq!(summaries[0].week_hours, 16.0, "deleted 8h record must be excluded");
        assert_eq!(summaries[0].month_hours, 16.0);
    }

    #[test]
    fn week_window_is_monday_through_sunday() {
        let employees = [employee(1, EmploymentType::FullTime)];
        let records = [
            completed(1, day(2026, 8, 2), 8.0),  // Sunday before the week
            completed(1, day(2026, 8, 3), 8.0),  // Monday
            completed(1, day(2026, 8, 9), 8.0),  // Sunday
            completed(1, day(2026, 8, 10), 8.0), // Monday after
        ];

        let summaries = summarize(&records, &employees, reference(), &HourTargets::default());
        assert_eq!(summaries[0].week_hours, 16.0);
        assert_eq!(summaries[0].month_hours, 32.0, "all four fall inside August");
    }

    #[test]
    fn week_straddling_a_month_boundary_counts_only_toward_the_week() {
        let employees = [employee(1, EmploymentType::FullTime)];
        // reference 2026-09-01 (Tuesday); its week starts Mon 2026-08-31
        let records = [completed(1, day(2026, 8, 31), 8.0)];

        let summaries = summarize(
            &records,
            &employees,
            day(2026, 9, 1),
            &HourTargets::default(),
        );
        assert_eq!(summaries[0].week_hours, 8.0);
        assert_eq!(summaries[0].month_hours, 0.0, "August record is outside September");
    }

    #[test]
    fn targets_follow_employment_type() {
        let employees = [
            employee(1, EmploymentType::FullTime),
            employee(2, EmploymentType::PartTime),
        ];
        let summaries = summarize(&[], &employees, reference(), &HourTargets::default());

        let full = summaries.iter().find(|s| s.employee_id == 1).unwrap();
        assert_eq!((full.week_target, full.month_target), (48.0, 192.0));
        let part = summaries.iter().find(|s| s.employee_id == 2).unwrap();
        assert_eq!((part.week_target, part.month_target), (24.0, 96.0));
    }

    #[test]
    fn rank_orders_by_month_hours_with_stable_ties() {
        let employees = [
            employee(1, EmploymentType::FullTime),
            employee(2, EmploymentType::FullTime),
            employee(3, EmploymentType::FullTime),
        ];
        let records = [
            completed(1, day(2026, 8, 3), 8.0),
            completed(2, day(2026, 8, 3), 8.0),
            completed(2, day(2026, 8, 4), 8.0),
            completed(3, day(2026, 8, 3), 8.0),
        ];

        let summaries = summarize(&records, &employees, reference(), &HourTargets::default());
        let ranked: Vec<(u64, u32)> = summaries.iter().map(|s| (s.employee_id, s.rank)).collect();
        // employee 2 leads, 1 and 3 tie at 8h and keep input order
        assert_eq!(ranked, vec![(2, 1), (1, 2), (3, 3)]);
    }

    #[test]
    fn display_hours_round_to_one_decimal() {
        let employees = [employee(1, EmploymentType::FullTime)];
        // two 7.58h days -> 15.16 internal -> 15.2 displayed
        let records = [
            completed(1, day(2026, 8, 3), 7.58),
            completed(1, day(2026, 8, 4), 7.58),
        ];

        let summaries = summarize(&records, &employees, reference(), &HourTargets::default());
        assert_eq!(summaries[0].week_hours, 15.2);
    }

    #[test]
    fn employees_without_records_still_get_a_summary() {
        let employees = [employee(5, EmploymentType::PartTime)];
        let summaries = summarize(&[], &employees, reference(), &HourTargets::default());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].week_hours, 0.0);
        assert_eq!(summaries[0].rank, 1);
    }
}
