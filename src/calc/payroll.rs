use serde::Serialize;
use utoipa::ToSchema;

use super::attendance::MonthlySummary;
use super::error::{CalcError, CalcResult};

/// Institution-level pay policy, sourced from configuration. The engine
/// accepts it as an input and hardcodes none of it.
#[derive(Debug, Clone, Copy)]
pub struct PayPolicy {
    /// Pro-rate base pay by present days over working days; full monthly
    /// salary when off.
    pub prorate_base_pay: bool,
    /// Used when an officer has no recorded daily working hours.
    pub default_normal_working_hours: f64,
    /// Flat TDS rate applied once gross pay reaches the threshold.
    pub tds_rate: f64,
    pub tds_threshold_monthly: f64,
}

/// Per-officer pay parameters for one month.
#[derive(Debug, Clone, Copy)]
pub struct PayInputs {
    pub salary_monthly: f64,
    pub hourly_rate: f64,
    pub overtime_rate_multiplier: f64,
    pub normal_working_hours: Option<f64>,
    pub deductions: f64,
}

/// Full-precision breakdown in rupees. Rounding to whole rupees happens at
/// display time only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PayBreakdown {
    pub expected_hours: f64,
    pub normal_hours_worked: f64,
    pub overtime_hours: f64,
    pub base_pay: f64,
    pub overtime_pay: f64,
    /// base_pay + overtime_pay, before deductions and TDS.
    pub calculated_pay: f64,
    pub deductions: f64,
    pub tds: f64,
    pub net_pay: f64,
}

/// Computes one officer's pay for a month from the attendance aggregate and
/// the calendar's working-day count.
///
/// Negative rates, deductions, or hours are rejected outright rather than
/// clamped. A month with zero working days short-circuits the pro-rated
/// path to zero base pay instead of dividing.
pub fn compute_pay(
    inputs: &PayInputs,
    attendance: &MonthlySummary,
    working_days_in_month: u32,
    policy: &PayPolicy,
) -> CalcResult<PayBreakdown> {
    if inputs.hourly_rate < 0.0 {
        return Err(CalcError::invalid(format!(
            "hourly_rate must not be negative, got {}",
            inputs.hourly_rate
        )));
    }
    if inputs.overtime_rate_multiplier < 0.0 {
        return Err(CalcError::invalid(format!(
            "overtime_rate_multiplier must not be negative, got {}",
            inputs.overtime_rate_multiplier
        )));
    }
    if inputs.salary_monthly < 0.0 {
        return Err(CalcError::invalid(format!(
            "salary_monthly must not be negative, got {}",
            inputs.salary_monthly
        )));
    }
    if inputs.deductions < 0.0 {
        return Err(CalcError::invalid(format!(
            "deductions must not be negative, got {}",
            inputs.deductions
        )));
    }
    if attendance.total_hours_worked < 0.0 {
        return Err(CalcError::invalid(format!(
            "total_hours_worked must not be negative, got {}",
            attendance.total_hours_worked
        )));
    }

    let normal_working_hours = inputs
        .normal_working_hours
        .unwrap_or(policy.default_normal_working_hours);

    let expected_hours = normal_working_hours * working_days_in_month as f64;
    let normal_hours_worked = attendance.total_hours_worked.min(expected_hours);
    let overtime_hours = (attendance.total_hours_worked - expected_hours).max(0.0);
    let overtime_pay = overtime_hours * inputs.hourly_rate * inputs.overtime_rate_multiplier;

    let base_pay = if policy.prorate_base_pay {
        if working_days_in_month == 0 {
            0.0
        } else {
            inputs.salary_monthly * attendance.present_days as f64
                / working_days_in_month as f64
        }
    } else {
        inputs.salary_monthly
    };

    let calculated_pay = base_pay + overtime_pay;

    let tds = if policy.tds_rate > 0.0 && calculated_pay >= policy.tds_threshold_monthly {
        calculated_pay * policy.tds_rate
    } else {
        0.0
    };

    Ok(PayBreakdown {
        expected_hours,
        normal_hours_worked,
        overtime_hours,
        base_pay,
        overtime_pay,
        calculated_pay,
        deductions: inputs.deductions,
        tds,
        net_pay: calculated_pay - inputs.deductions - tds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PayPolicy {
        PayPolicy {
            prorate_base_pay: true,
            default_normal_working_hours: 8.0,
            tds_rate: 0.0,
            tds_threshold_monthly: 0.0,
        }
    }

    fn inputs() -> PayInputs {
        PayInputs {
            salary_monthly: 46_000.0,
            hourly_rate: 300.0,
            overtime_rate_multiplier: 1.5,
            normal_working_hours: Some(7.0),
            deductions: 0.0,
        }
    }

    fn attendance(present_days: u32, hours: f64) -> MonthlySummary {
        MonthlySummary {
            present_days,
            total_hours_worked: hours,
            ..Default::default()
        }
    }

    #[test]
    fn hours_under_expected_earn_no_overtime() {
        // 160 worked against 7 x 23 = 161 expected
        let pay = compute_pay(&inputs(), &attendance(20, 160.0), 23, &policy()).unwrap();
        assert_eq!(pay.expected_hours, 161.0);
        assert_eq!(pay.overtime_hours, 0.0);
        assert_eq!(pay.overtime_pay, 0.0);
        assert_eq!(pay.normal_hours_worked, 160.0);
    }

    #[test]
    fn hours_over_expected_earn_multiplied_overtime() {
        let pay = compute_pay(&inputs(), &attendance(23, 171.0), 23, &policy()).unwrap();
        assert_eq!(pay.overtime_hours, 10.0);
        assert_eq!(pay.normal_hours_worked, 161.0);
        // 10h x 300 x 1.5
        assert_eq!(pay.overtime_pay, 4_500.0);
    }

    #[test]
    fn prorated_base_pay_scales_by_present_days() {
        let pay = compute_pay(&inputs(), &attendance(20, 140.0), 23, &policy()).unwrap();
        assert_eq!(pay.base_pay, 46_000.0 * 20.0 / 23.0);
        assert_eq!(pay.net_pay, pay.base_pay);
    }

    #[test]
    fn full_salary_when_proration_is_off() {
        let full = PayPolicy {
            prorate_base_pay: false,
            ..policy()
        };

        let pay = compute_pay(&inputs(), &attendance(3, 21.0), 23, &full).unwrap();
        assert_eq!(pay.base_pay, 46_000.0);
    }

    #[test]
    fn zero_working_days_short_circuits_to_zero_base() {
        let pay = compute_pay(&inputs(), &attendance(0, 0.0), 0, &policy()).unwrap();
        assert_eq!(pay.base_pay, 0.0);
        assert_eq!(pay.expected_hours, 0.0);
        assert_eq!(pay.net_pay, 0.0);
    }

    #[test]
    fn missing_working_hours_fall_back_to_policy_default() {
        let without_hours = PayInputs {
            normal_working_hours: None,
            ..inputs()
        };

        let pay = compute_pay(&without_hours, &attendance(20, 150.0), 20, &policy()).unwrap();
        // policy default 8h x 20 days
        assert_eq!(pay.expected_hours, 160.0);
    }

    #[test]
    fn negative_deductions_are_rejected() {
        let bad = PayInputs {
            deductions: -100.0,
            ..inputs()
        };

        assert!(matches!(
            compute_pay(&bad, &attendance(20, 140.0), 23, &policy()),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn negative_hourly_rate_is_rejected_not_clamped() {
        let bad = PayInputs {
            hourly_rate: -1.0,
            ..inputs()
        };

        let err = compute_pay(&bad, &attendance(20, 140.0), 23, &policy()).unwrap_err();
        assert!(err.to_string().contains("hourly_rate"));
    }

    #[test]
    fn deductions_and_tds_come_out_of_net_pay() {
        let taxed = PayPolicy {
            tds_rate: 0.1,
            tds_threshold_monthly: 40_000.0,
            ..policy()
        };
        let with_deductions = PayInputs {
            deductions: 1_000.0,
            ..inputs()
        };

        let pay = compute_pay(&with_deductions, &attendance(23, 161.0), 23, &taxed).unwrap();
        assert_eq!(pay.base_pay, 46_000.0);
        assert_eq!(pay.tds, 4_600.0);
        assert_eq!(pay.net_pay, 46_000.0 - 1_000.0 - 4_600.0);
    }

    #[test]
    fn gross_under_threshold_pays_no_tds() {
        let taxed = PayPolicy {
            tds_rate: 0.1,
            tds_threshold_monthly: 50_000.0,
            ..policy()
        };

        let pay = compute_pay(&inputs(), &attendance(23, 161.0), 23, &taxed).unwrap();
        assert_eq!(pay.tds, 0.0);
    }

    #[test]
    fn breakdown_carries_full_precision() {
        let odd_salary = PayInputs {
            salary_monthly: 50_000.0,
            ..inputs()
        };

        let pay = compute_pay(&odd_salary, &attendance(22, 154.0), 23, &policy()).unwrap();
        // 50000 x 22 / 23 is not a whole number; nothing rounds it here
        assert!(pay.base_pay.fract() != 0.0);
        assert!((pay.base_pay - 47_826.086_956_521_74).abs() < 1e-9);
    }
}
