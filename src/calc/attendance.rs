use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

/// One day's attendance as the aggregator sees it. `status = None` is a row
/// that exists but was never marked; it counts toward nothing.
#[derive(Debug, Clone, Copy)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: Option<AttendanceStatus>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<f64>,
}

impl DayRecord {
    /// Worked hours for this record: the stored value when present,
    /// otherwise derived from check-in/check-out when both exist.
    fn effective_hours(&self) -> f64 {
        if let Some(hours) = self.hours_worked {
            return hours;
        }

        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) if end > start => {
                (end - start).num_minutes() as f64 / 60.0
            }
            _ => 0.0,
        }
    }
}

/// Derived monthly roll-up. Never stored on its own; recomputed from the
/// month's daily rows on every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema, Default)]
pub struct MonthlySummary {
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub total_hours_worked: f64,
    #[schema(value_type = Option<String>, format = "date")]
    pub last_marked_date: Option<NaiveDate>,
}

/// Folds one month of records into a summary.
///
/// Each marked record increments exactly one counter. Hours accumulate only
/// from `present` records; leave and absent days carry none. Unmarked days
/// are excluded, not treated as absent, so the counters can never exceed the
/// number of days in the month.
pub fn aggregate_month(records: &[DayRecord]) -> MonthlySummary {
    let mut summary = MonthlySummary::default();

    for record in records {
        let Some(status) = record.status else {
            continue;
        };

        match status {
            AttendanceStatus::Present => {
                summary.present_days += 1;
                summary.total_hours_worked += record.effective_hours();
            }
            AttendanceStatus::Absent => summary.absent_days += 1,
            AttendanceStatus::Leave => summary.leave_days += 1,
        }

        summary.last_marked_date = summary.last_marked_date.max(Some(record.date));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn marked(d: u32, status: AttendanceStatus, hours: Option<f64>) -> DayRecord {
        DayRecord {
            date: date(d),
            status: Some(status),
            check_in: None,
            check_out: None,
            hours_worked: hours,
        }
    }

    #[test]
    fn counts_each_status_once() {
        let records = vec![
            marked(1, AttendanceStatus::Present, Some(8.0)),
            marked(2, AttendanceStatus::Present, Some(7.5)),
            marked(3, AttendanceStatus::Absent, None),
            marked(4, AttendanceStatus::Leave, None),
        ];

        let summary = aggregate_month(&records);
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(summary.total_hours_worked, 15.5);
        assert_eq!(summary.last_marked_date, Some(date(4)));
    }

    #[test]
    fn unmarked_rows_count_toward_nothing() {
        let records = vec![
            marked(1, AttendanceStatus::Present, Some(8.0)),
            DayRecord {
                date: date(2),
                status: None,
                check_in: Some(time(9, 0)),
                check_out: None,
                hours_worked: None,
            },
        ];

        let summary = aggregate_month(&records);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.absent_days, 0);
        assert_eq!(summary.leave_days, 0);
        assert_eq!(summary.last_marked_date, Some(date(1)));
    }

    #[test]
    fn hours_derived_from_check_times_when_not_stored() {
        let records = vec![DayRecord {
            date: date(1),
            status: Some(AttendanceStatus::Present),
            check_in: Some(time(9, 0)),
            check_out: Some(time(17, 30)),
            hours_worked: None,
        }];

        assert_eq!(aggregate_month(&records).total_hours_worked, 8.5);
    }

    #[test]
    fn leave_rows_never_contribute_hours() {
        let records = vec![DayRecord {
            date: date(1),
            status: Some(AttendanceStatus::Leave),
            check_in: Some(time(9, 0)),
            check_out: Some(time(17, 0)),
            hours_worked: Some(8.0),
        }];

        let summary = aggregate_month(&records);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(summary.total_hours_worked, 0.0);
    }

    #[test]
    fn zero_present_days_means_zero_hours() {
        let records = vec![
            marked(1, AttendanceStatus::Absent, None),
            marked(2, AttendanceStatus::Leave, None),
        ];

        let summary = aggregate_month(&records);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.total_hours_worked, 0.0);
    }

    #[test]
    fn empty_month_is_all_zeros() {
        assert_eq!(aggregate_month(&[]), MonthlySummary::default());
    }

    #[test]
    fn full_month_exactly_matching_working_days_is_valid() {
        // 22 present + 1 leave against 23 working days: exact match, no error
        let mut records: Vec<DayRecord> = (1..=22)
            .map(|d| marked(d, AttendanceStatus::Present, Some(7.0)))
            .collect();
        records.push(marked(23, AttendanceStatus::Leave, None));

        let summary = aggregate_month(&records);
        assert_eq!(summary.present_days, 22);
        assert_eq!(summary.absent_days, 0);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(
            summary.present_days + summary.absent_days + summary.leave_days,
            23
        );
    }
}
