//! Month-over-month task analytics.
//!
//! Counts are bucketed by task `created_at` into the current and previous
//! calendar month (UTC). The database computes the raw counts; this module
//! owns the window arithmetic and the differences.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::types::Timestamp;

/// Half-open month ranges `[last_month_start, this_month_start)` and
/// `[this_month_start, next_month_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub last_month_start: Timestamp,
    pub this_month_start: Timestamp,
    pub next_month_start: Timestamp,
}

impl MonthWindow {
    pub fn containing(now: Timestamp) -> Self {
        let this_month = first_of_month(now.date_naive());
        let last_month = first_of_month(this_month - Duration::days(1));
        let next_month = first_of_month(this_month + Duration::days(32));
        Self {
            last_month_start: midnight(last_month),
            this_month_start: midnight(this_month),
            next_month_start: midnight(next_month),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Raw counts for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: i64,
    pub assigned: i64,
    pub complete: i64,
    pub incomplete: i64,
    pub overdue: i64,
}

/// This month's counts and their change against last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskAnalytics {
    pub task_count: i64,
    pub task_difference: i64,
    pub assigned_task_count: i64,
    pub assigned_task_difference: i64,
    pub complete_task_count: i64,
    pub complete_task_difference: i64,
    pub incomplete_task_count: i64,
    pub incomplete_task_difference: i64,
    pub overdue_task_count: i64,
    pub overdue_task_difference: i64,
}

impl TaskAnalytics {
    pub fn compare(this_month: TaskCounts, last_month: TaskCounts) -> Self {
        Self {
            task_count: this_month.total,
            task_difference: this_month.total - last_month.total,
            assigned_task_count: this_month.assigned,
            assigned_task_difference: this_month.assigned - last_month.assigned,
            complete_task_count: this_month.complete,
            complete_task_difference: this_month.complete - last_month.complete,
            incomplete_task_count: this_month.incomplete,
            incomplete_task_difference: this_month.incomplete - last_month.incomplete,
            overdue_task_count: this_month.overdue,
            overdue_task_difference: this_month.overdue - last_month.overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn window_mid_month() {
        let now = Utc.with_ymd_and_hms(2026, 5, 17, 9, 30, 0).unwrap();
        let w = MonthWindow::containing(now);
        assert_eq!(w.last_month_start, Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(w.this_month_start, Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(w.next_month_start, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn window_wraps_year_in_january() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let w = MonthWindow::containing(now);
        assert_eq!(w.last_month_start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(w.this_month_start, now);
        assert_eq!(w.next_month_start, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn window_handles_month_end_in_december() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let w = MonthWindow::containing(now);
        assert_eq!(w.next_month_start, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn differences_can_be_negative() {
        let this_month = TaskCounts { total: 3, assigned: 1, complete: 1, incomplete: 2, overdue: 0 };
        let last_month = TaskCounts { total: 5, assigned: 1, complete: 4, incomplete: 1, overdue: 1 };

        let a = TaskAnalytics::compare(this_month, last_month);

        assert_eq!(a.task_count, 3);
        assert_eq!(a.task_difference, -2);
        assert_eq!(a.assigned_task_difference, 0);
        assert_eq!(a.complete_task_difference, -3);
        assert_eq!(a.incomplete_task_difference, 1);
        assert_eq!(a.overdue_task_difference, -1);
    }
}
