use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

/// Annual leave credited per full month of service.
pub const MONTHLY_CREDIT: u32 = 1;

/// Pro-rated annual leave entitlement for one officer and target year.
/// Derived entirely from the join date; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProRatedLeave {
    pub total_entitlement: u32,
    pub months_worked: u32,
    pub monthly_credit: u32,
    /// First month (1-12) with any credit; 0 when not employed that year.
    pub start_month: u32,
    #[schema(value_type = Option<String>, format = "date")]
    pub join_date: Option<NaiveDate>,
}

/// Computes the leave entitlement for `year` from an officer's join date.
///
/// Officers without a recorded join date get the full-year default of 12 —
/// legacy imports predate the join-date column and are treated as always
/// employed. A join inside the target year credits one day per month from
/// the join month inclusive, so a June join earns `13 - 6 = 7`. A join
/// after the target year earns nothing.
pub fn pro_rated_entitlement(join_date: Option<NaiveDate>, year: i32) -> ProRatedLeave {
    let Some(joined) = join_date else {
        return ProRatedLeave {
            total_entitlement: 12,
            months_worked: 12,
            monthly_credit: MONTHLY_CREDIT,
            start_month: 1,
            join_date: None,
        };
    };

    let join_year = joined.year();
    let join_month = joined.month();

    if join_year < year {
        ProRatedLeave {
            total_entitlement: 12,
            months_worked: 12,
            monthly_credit: MONTHLY_CREDIT,
            start_month: 1,
            join_date,
        }
    } else if join_year == year {
        let months_remaining = 13 - join_month;
        ProRatedLeave {
            total_entitlement: months_remaining * MONTHLY_CREDIT,
            months_worked: months_remaining,
            monthly_credit: MONTHLY_CREDIT,
            start_month: join_month,
            join_date,
        }
    } else {
        ProRatedLeave {
            total_entitlement: 0,
            months_worked: 0,
            monthly_credit: 0,
            start_month: 0,
            join_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn earlier_join_year_gives_full_entitlement() {
        let info = pro_rated_entitlement(Some(date(2023, 1, 1)), 2024);
        assert_eq!(info.total_entitlement, 12);
        assert_eq!(info.months_worked, 12);
        assert_eq!(info.monthly_credit, 1);
        assert_eq!(info.start_month, 1);
    }

    #[test]
    fn mid_year_join_prorates_from_join_month() {
        // joined 2024-06-15, target 2024: 13 - 6 = 7
        let info = pro_rated_entitlement(Some(date(2024, 6, 15)), 2024);
        assert_eq!(info.total_entitlement, 7);
        assert_eq!(info.start_month, 6);
        assert_eq!(info.monthly_credit, 1);
    }

    #[test]
    fn same_year_join_covers_all_months() {
        for month in 1..=12 {
            let info = pro_rated_entitlement(Some(date(2024, month, 1)), 2024);
            assert_eq!(info.total_entitlement, 13 - month);
            assert_eq!(info.start_month, month);
        }
    }

    #[test]
    fn january_join_earns_twelve_december_join_earns_one() {
        assert_eq!(
            pro_rated_entitlement(Some(date(2024, 1, 31)), 2024).total_entitlement,
            12
        );
        assert_eq!(
            pro_rated_entitlement(Some(date(2024, 12, 1)), 2024).total_entitlement,
            1
        );
    }

    #[test]
    fn future_join_year_earns_nothing() {
        let info = pro_rated_entitlement(Some(date(2025, 3, 1)), 2024);
        assert_eq!(info.total_entitlement, 0);
        assert_eq!(info.months_worked, 0);
        assert_eq!(info.monthly_credit, 0);
        assert_eq!(info.start_month, 0);
    }

    #[test]
    fn missing_join_date_falls_back_to_full_year() {
        let info = pro_rated_entitlement(None, 2024);
        assert_eq!(info.total_entitlement, 12);
        assert_eq!(info.monthly_credit, 1);
        assert_eq!(info.start_month, 1);
        assert_eq!(info.join_date, None);
    }

    #[test]
    fn same_inputs_give_identical_output() {
        let a = pro_rated_entitlement(Some(date(2024, 6, 15)), 2024);
        let b = pro_rated_entitlement(Some(date(2024, 6, 15)), 2024);
        assert_eq!(a, b);
    }

    #[test]
    fn join_day_within_month_is_irrelevant() {
        let first = pro_rated_entitlement(Some(date(2024, 6, 1)), 2024);
        let last = pro_rated_entitlement(Some(date(2024, 6, 30)), 2024);
        assert_eq!(first.total_entitlement, last.total_entitlement);
    }
}
