use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::entitlement::ProRatedLeave;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// A leave application as the balance calculation sees it. Paid days consume
/// entitlement; loss-of-pay days are unpaid absence tracked alongside it.
#[derive(Debug, Clone, Copy)]
pub struct Application {
    pub start_date: NaiveDate,
    pub status: LeaveStatus,
    pub paid_days: f64,
    pub lop_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct YearlySummary {
    pub total_entitlement: f64,
    pub total_used: f64,
    pub total_lop: f64,
    pub remaining: f64,
}

/// True when `month` of `year` falls before the officer's first credited
/// month. Such months have zero balance and must not reach the balance RPC
/// or any persisted state.
pub fn before_start(entitlement: &ProRatedLeave, year: i32, month: u32) -> bool {
    let Some(joined) = entitlement.join_date else {
        return false;
    };

    if joined.year() > year {
        return true;
    }

    joined.year() == year && month < entitlement.start_month
}

/// Folds a year's applications into usage totals.
///
/// Only approved applications with a start date inside `year` count.
/// `remaining` is floored at zero; loss-of-pay days never reduce it.
pub fn yearly_summary(
    total_entitlement: f64,
    year: i32,
    applications: &[Application],
) -> YearlySummary {
    let mut total_used = 0.0;
    let mut total_lop = 0.0;

    for application in applications {
        if application.start_date.year() != year || application.status != LeaveStatus::Approved {
            continue;
        }

        total_used += application.paid_days;
        total_lop += application.lop_days;
    }

    YearlySummary {
        total_entitlement,
        total_used,
        total_lop,
        remaining: (total_entitlement - total_used).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::entitlement::pro_rated_entitlement;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approved(y: i32, m: u32, paid: f64, lop: f64) -> Application {
        Application {
            start_date: date(y, m, 1),
            status: LeaveStatus::Approved,
            paid_days: paid,
            lop_days: lop,
        }
    }

    #[test]
    fn months_before_join_have_no_balance() {
        // joined 2024-06-15: March 2024 is before the start month
        let entitlement = pro_rated_entitlement(Some(date(2024, 6, 15)), 2024);
        assert!(before_start(&entitlement, 2024, 3));
        assert!(!before_start(&entitlement, 2024, 6));
        assert!(!before_start(&entitlement, 2024, 9));
    }

    #[test]
    fn earlier_join_years_are_never_gated() {
        let entitlement = pro_rated_entitlement(Some(date(2023, 8, 1)), 2024);
        assert!(!before_start(&entitlement, 2024, 1));
    }

    #[test]
    fn future_join_years_gate_every_month() {
        let entitlement = pro_rated_entitlement(Some(date(2025, 2, 1)), 2024);
        for month in 1..=12 {
            assert!(before_start(&entitlement, 2024, month));
        }
    }

    #[test]
    fn missing_join_date_is_never_gated() {
        let entitlement = pro_rated_entitlement(None, 2024);
        assert!(!before_start(&entitlement, 2024, 1));
    }

    #[test]
    fn only_approved_applications_count() {
        let applications = vec![
            approved(2024, 2, 2.0, 0.0),
            Application {
                start_date: date(2024, 3, 1),
                status: LeaveStatus::Pending,
                paid_days: 5.0,
                lop_days: 0.0,
            },
            Application {
                start_date: date(2024, 4, 1),
                status: LeaveStatus::Rejected,
                paid_days: 3.0,
                lop_days: 1.0,
            },
        ];

        let summary = yearly_summary(12.0, 2024, &applications);
        assert_eq!(summary.total_used, 2.0);
        assert_eq!(summary.total_lop, 0.0);
        assert_eq!(summary.remaining, 10.0);
    }

    #[test]
    fn applications_outside_year_are_ignored() {
        let applications = vec![approved(2023, 12, 4.0, 0.0), approved(2024, 1, 1.0, 0.0)];

        let summary = yearly_summary(12.0, 2024, &applications);
        assert_eq!(summary.total_used, 1.0);
    }

    #[test]
    fn remaining_never_goes_negative() {
        let applications = vec![approved(2024, 1, 9.0, 0.0), approved(2024, 5, 6.0, 0.0)];

        let summary = yearly_summary(12.0, 2024, &applications);
        assert_eq!(summary.total_used, 15.0);
        assert_eq!(summary.remaining, 0.0);
    }

    #[test]
    fn lop_days_do_not_reduce_remaining() {
        let applications = vec![approved(2024, 1, 2.0, 5.0)];

        let summary = yearly_summary(12.0, 2024, &applications);
        assert_eq!(summary.total_lop, 5.0);
        assert_eq!(summary.remaining, 10.0);
    }

    #[test]
    fn empty_year_keeps_full_entitlement() {
        let summary = yearly_summary(7.0, 2024, &[]);
        assert_eq!(summary.total_used, 0.0);
        assert_eq!(summary.remaining, 7.0);
    }
}
