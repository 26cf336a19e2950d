use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::error::{CalcError, CalcResult};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayType {
    Working,
    Weekend,
    Holiday,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CalendarType {
    Company,
    Institution,
}

/// One classified calendar date. The caller has already scoped the query to
/// a single `(calendar_type, institution_id)` key, so entries carry no scope
/// of their own here.
#[derive(Debug, Clone, Copy)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub day_type: DayType,
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> CalcResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalcError::invalid(format!("no such month: {year}-{month:02}")))?;

    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| CalcError::invalid(format!("no month after {year}-{month:02}")))?;

    // first of next month always has a predecessor
    Ok((first, next_first.pred_opt().unwrap_or(first)))
}

/// All dates of a month, in order.
pub fn month_dates(year: i32, month: u32) -> CalcResult<Vec<NaiveDate>> {
    let (first, last) = month_bounds(year, month)?;
    Ok(first.iter_days().take_while(|d| *d <= last).collect())
}

/// Builds the date → day-type map for one month out of scoped entries.
///
/// Institution queries return only institution rows and company queries only
/// unscoped rows; there is no fallback between the two scopes. Callers that
/// want both must query both and merge. A date missing from the result is
/// unclassified — neither working nor non-working.
pub fn day_types_for_month(
    entries: &[DayEntry],
    year: i32,
    month: u32,
) -> CalcResult<BTreeMap<NaiveDate, DayType>> {
    let (first, last) = month_bounds(year, month)?;

    Ok(entries
        .iter()
        .filter(|e| e.date >= first && e.date <= last)
        .map(|e| (e.date, e.day_type))
        .collect())
}

/// Sorted working dates from a resolved month map. Unclassified dates are
/// excluded, never defaulted.
pub fn working_days(day_types: &BTreeMap<NaiveDate, DayType>) -> Vec<NaiveDate> {
    day_types
        .iter()
        .filter(|(_, day_type)| **day_type == DayType::Working)
        .map(|(date, _)| *date)
        .collect()
}

/// Classification used by calendar quick-setup: Saturday and Sunday become
/// weekends, everything else a working day. Holidays are never produced
/// here — the bulk setup replaces the whole date range, existing holiday
/// rows included.
pub fn quick_setup_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Working,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_handles_leap_february() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, date(2024, 2, 1));
        assert_eq!(last, date(2024, 2, 29));
    }

    #[test]
    fn month_bounds_handles_december() {
        let (first, last) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, date(2024, 12, 1));
        assert_eq!(last, date(2024, 12, 31));
    }

    #[test]
    fn month_bounds_rejects_month_13() {
        assert!(matches!(
            month_bounds(2024, 13),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn month_dates_covers_whole_month() {
        let dates = month_dates(2024, 1).unwrap();
        assert_eq!(dates.len(), 31);
        assert_eq!(dates[0], date(2024, 1, 1));
        assert_eq!(dates[30], date(2024, 1, 31));
    }

    #[test]
    fn day_types_drop_entries_outside_month() {
        let entries = vec![
            DayEntry {
                date: date(2024, 1, 15),
                day_type: DayType::Working,
            },
            DayEntry {
                date: date(2024, 2, 1),
                day_type: DayType::Holiday,
            },
        ];

        let map = day_types_for_month(&entries, 2024, 1).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&date(2024, 1, 15)), Some(&DayType::Working));
    }

    #[test]
    fn working_days_excludes_unclassified_and_non_working() {
        let entries = vec![
            DayEntry {
                date: date(2024, 1, 1),
                day_type: DayType::Holiday,
            },
            DayEntry {
                date: date(2024, 1, 2),
                day_type: DayType::Working,
            },
            DayEntry {
                date: date(2024, 1, 6),
                day_type: DayType::Weekend,
            },
            // 2024-01-03 onward left unclassified on purpose
        ];

        let map = day_types_for_month(&entries, 2024, 1).unwrap();
        assert_eq!(working_days(&map), vec![date(2024, 1, 2)]);
    }

    #[test]
    fn working_days_are_sorted() {
        let entries = vec![
            DayEntry {
                date: date(2024, 1, 10),
                day_type: DayType::Working,
            },
            DayEntry {
                date: date(2024, 1, 2),
                day_type: DayType::Working,
            },
        ];

        let map = day_types_for_month(&entries, 2024, 1).unwrap();
        assert_eq!(working_days(&map), vec![date(2024, 1, 2), date(2024, 1, 10)]);
    }

    #[test]
    fn quick_setup_marks_saturday_and_sunday_as_weekend() {
        // 2024-06-15 is a Saturday, 2024-06-16 a Sunday, 2024-06-17 a Monday
        assert_eq!(quick_setup_day_type(date(2024, 6, 15)), DayType::Weekend);
        assert_eq!(quick_setup_day_type(date(2024, 6, 16)), DayType::Weekend);
        assert_eq!(quick_setup_day_type(date(2024, 6, 17)), DayType::Working);
    }

    #[test]
    fn day_type_round_trips_through_strings() {
        assert_eq!("holiday".parse::<DayType>().unwrap(), DayType::Holiday);
        assert_eq!(DayType::Working.to_string(), "working");
        assert_eq!(
            "institution".parse::<CalendarType>().unwrap(),
            CalendarType::Institution
        );
    }
}
