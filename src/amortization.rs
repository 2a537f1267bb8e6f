//! Loan amortization calculator.
//!
//! Turns the calculator form inputs into the compound amount owed at the end
//! of the term, the interest that adds up to, and a flat monthly installment
//! (`total_repayment / months`). The installment is not an annuity payment.
use crate::error::{ChamaError, Result};
use crate::format::round;
use log::{debug, trace};
use std::{fmt, str::FromStr};

/// Largest principal accepted by [`validate`].
pub const MAX_PRINCIPAL: f64 = 1e12;
/// Largest annual rate, in percent, after monthly rates are annualized.
pub const MAX_ANNUAL_RATE: f64 = 1000.;
/// Longest term accepted, in months (100 years).
pub const MAX_TERM_MONTHS: u32 = 1200;

/// The period a nominal rate is quoted for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateBasis {
    Monthly,
    Yearly,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationUnit {
    Months,
    Years,
}

/// How often interest is added to the balance.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compounding {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for RateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateBasis::Monthly => write!(f, "Monthly"),
            RateBasis::Yearly => write!(f, "Yearly"),
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Months => write!(f, "Months"),
            DurationUnit::Years => write!(f, "Years"),
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compounding::Daily => write!(f, "Daily"),
            Compounding::Weekly => write!(f, "Weekly"),
            Compounding::Monthly => write!(f, "Monthly"),
            Compounding::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for RateBasis {
    type Err = ChamaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(RateBasis::Monthly),
            "yearly" => Ok(RateBasis::Yearly),
            _ => Err(ChamaError::invalid(
                "rate_basis",
                format!("unknown rate basis '{}', expected monthly or yearly", s),
            )),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = ChamaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "months" => Ok(DurationUnit::Months),
            "years" => Ok(DurationUnit::Years),
            _ => Err(ChamaError::invalid(
                "duration_unit",
                format!("unknown duration unit '{}', expected months or years", s),
            )),
        }
    }
}

impl FromStr for Compounding {
    type Err = ChamaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Compounding::Daily),
            "weekly" => Ok(Compounding::Weekly),
            "monthly" => Ok(Compounding::Monthly),
            "yearly" => Ok(Compounding::Yearly),
            _ => Err(ChamaError::invalid(
                "compounding",
                format!(
                    "unknown compounding '{}', expected daily, weekly, monthly or yearly",
                    s
                ),
            )),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanCalculationInput {
    pub principal: f64,
    /// Percentage, e.g. `10.` for 10 %.
    pub nominal_rate: f64,
    pub rate_basis: RateBasis,
    pub duration: u32,
    pub duration_unit: DurationUnit,
    pub compounding: Compounding,
}

impl Default for LoanCalculationInput {
    fn default() -> Self {
        Self {
            principal: 10000.,
            nominal_rate: 10.,
            rate_basis: RateBasis::Yearly,
            duration: 12,
            duration_unit: DurationUnit::Months,
            compounding: Compounding::Monthly,
        }
    }
}

impl LoanCalculationInput {
    pub fn new(
        principal: f64,
        nominal_rate: f64,
        rate_basis: RateBasis,
        duration: u32,
        duration_unit: DurationUnit,
        compounding: Compounding,
    ) -> Self {
        Self {
            principal,
            nominal_rate,
            rate_basis,
            duration,
            duration_unit,
            compounding,
        }
    }

    /// Nominal rate normalized to an annual percentage.
    pub fn annual_rate(&self) -> f64 {
        match self.rate_basis {
            RateBasis::Monthly => self.nominal_rate * 12.,
            RateBasis::Yearly => self.nominal_rate,
        }
    }

    pub fn periods_per_year(&self) -> f64 {
        get_compounding_periods(self.compounding)
    }

    pub fn duration_in_months(&self) -> u32 {
        match self.duration_unit {
            DurationUnit::Months => self.duration,
            DurationUnit::Years => self.duration.saturating_mul(12),
        }
    }

    /// Term length in years.
    pub fn years(&self) -> f64 {
        match self.duration_unit {
            DurationUnit::Months => self.duration as f64 / 12.,
            DurationUnit::Years => self.duration as f64,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanCalculationResult {
    pub total_repayment: f64,
    pub total_interest: f64,
    pub monthly_installment: f64,
}

impl fmt::Display for LoanCalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "monthly installment {:.2}, total interest {:.2}, total repayment {:.2}",
            round(self.monthly_installment, 2),
            round(self.total_interest, 2),
            round(self.total_repayment, 2)
        )
    }
}

fn get_compounding_periods(compounding: Compounding) -> f64 {
    match compounding {
        Compounding::Daily => 365.,
        Compounding::Weekly => 52.,
        Compounding::Monthly => 12.,
        Compounding::Yearly => 1.,
    }
}

/// Reject input the calculator cannot give a meaningful answer for.
///
/// Runs every check, including the overflow bound on the compound amount,
/// without computing the amount itself.
pub fn validate(input: &LoanCalculationInput) -> Result<()> {
    if !input.principal.is_finite() || input.principal <= 0. {
        return Err(ChamaError::invalid(
            "principal",
            "principal must be greater than zero",
        ));
    }
    if input.principal > MAX_PRINCIPAL {
        return Err(ChamaError::invalid(
            "principal",
            format!("principal must not exceed {}", MAX_PRINCIPAL),
        ));
    }
    if !input.nominal_rate.is_finite() || input.nominal_rate < 0. {
        return Err(ChamaError::invalid(
            "nominal_rate",
            "interest rate cannot be negative",
        ));
    }
    if input.annual_rate() > MAX_ANNUAL_RATE {
        return Err(ChamaError::invalid(
            "nominal_rate",
            format!("annual rate must not exceed {}%", MAX_ANNUAL_RATE),
        ));
    }
    if input.duration == 0 {
        return Err(ChamaError::invalid(
            "duration",
            "duration must be greater than zero",
        ));
    }
    if input.duration_in_months() > MAX_TERM_MONTHS {
        return Err(ChamaError::invalid(
            "duration",
            format!("term must not exceed {} months", MAX_TERM_MONTHS),
        ));
    }

    // ln(A) = ln(P) + n*t*ln(1 + r/n)
    let n = input.periods_per_year();
    let r = input.annual_rate() / 100.;
    let log_amount = input.principal.ln() + n * input.years() * (r / n).ln_1p();
    if log_amount >= f64::MAX.ln() {
        return Err(ChamaError::invalid(
            "nominal_rate",
            "rate and term are too large to compute a repayment",
        ));
    }

    Ok(())
}

/// Compound the principal over the term: `A = P * (1 + r/n)^(n*t)`.
pub fn compute(input: &LoanCalculationInput) -> Result<LoanCalculationResult> {
    validate(input)?;

    let r = input.annual_rate() / 100.;
    let n = input.periods_per_year();
    let t = input.years();
    trace!("annual rate {}, periods per year {}, years {}", r, n, t);

    let total_repayment = input.principal * (1. + r / n).powf(n * t);
    let total_interest = total_repayment - input.principal;

    let total_months = t * 12.;
    let monthly_installment = if total_months > 0. {
        total_repayment / total_months
    } else {
        total_repayment
    };

    let result = LoanCalculationResult {
        total_repayment,
        total_interest,
        monthly_installment,
    };
    debug!("computed {} for {:?}", result, input);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{
        compute, validate, Compounding, DurationUnit, LoanCalculationInput, RateBasis,
        MAX_PRINCIPAL,
    };
    use crate::error::ChamaError;
    use test_log::test;

    const COMPOUNDINGS: [Compounding; 4] = [
        Compounding::Daily,
        Compounding::Weekly,
        Compounding::Monthly,
        Compounding::Yearly,
    ];

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected ~{}, got {}",
            expected,
            actual
        );
    }

    fn field_of(err: ChamaError) -> String {
        match err {
            ChamaError::InvalidArgument { field, .. } => field,
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_default_form_values() {
        let result = compute(&LoanCalculationInput::default()).unwrap();

        assert_close(result.total_repayment, 11047.13, 0.01);
        assert_close(result.total_interest, 1047.13, 0.01);
        assert_close(result.monthly_installment, 920.59, 0.01);
    }

    #[test]
    fn test_zero_rate_short_term() {
        let input = LoanCalculationInput::new(
            5000.,
            0.,
            RateBasis::Yearly,
            6,
            DurationUnit::Months,
            Compounding::Weekly,
        );
        let result = compute(&input).unwrap();

        assert_eq!(result.total_repayment, 5000.);
        assert_eq!(result.total_interest, 0.);
        assert_close(result.monthly_installment, 833.33, 0.01);
    }

    #[test]
    fn test_yearly_compounding_in_years() {
        let input = LoanCalculationInput::new(
            100000.,
            12.,
            RateBasis::Yearly,
            2,
            DurationUnit::Years,
            Compounding::Yearly,
        );
        let result = compute(&input).unwrap();

        assert_close(result.total_repayment, 125440., 1e-6);
        assert_close(result.total_interest, 25440., 1e-6);
        assert_close(result.monthly_installment, 5226.67, 0.01);
    }

    #[test]
    fn test_zero_rate_never_accrues() {
        for compounding in COMPOUNDINGS {
            for basis in [RateBasis::Monthly, RateBasis::Yearly] {
                for (duration, unit) in [(1, DurationUnit::Months), (7, DurationUnit::Years)] {
                    let input =
                        LoanCalculationInput::new(2500., 0., basis, duration, unit, compounding);
                    let result = compute(&input).unwrap();
                    assert_eq!(result.total_repayment, 2500.);
                    assert_eq!(result.total_interest, 0.);
                }
            }
        }
    }

    #[test]
    fn test_longer_terms_cost_more() {
        for compounding in COMPOUNDINGS {
            let mut previous = 0.;
            for duration in 1..=60 {
                let input = LoanCalculationInput::new(
                    20000.,
                    8.,
                    RateBasis::Yearly,
                    duration,
                    DurationUnit::Months,
                    compounding,
                );
                let repayment = compute(&input).unwrap().total_repayment;
                assert!(
                    repayment > previous,
                    "{} months {:?}: {} <= {}",
                    duration,
                    compounding,
                    repayment,
                    previous
                );
                previous = repayment;
            }
        }
    }

    #[test]
    fn test_monthly_rate_matches_yearly_rate() {
        for compounding in COMPOUNDINGS {
            for yearly_rate in [12., 10., 3.5] {
                let yearly = LoanCalculationInput::new(
                    15000.,
                    yearly_rate,
                    RateBasis::Yearly,
                    18,
                    DurationUnit::Months,
                    compounding,
                );
                let monthly = LoanCalculationInput {
                    nominal_rate: yearly_rate / 12.,
                    rate_basis: RateBasis::Monthly,
                    ..yearly
                };
                assert_close(monthly.annual_rate(), yearly.annual_rate(), 1e-9);

                let a = compute(&yearly).unwrap();
                let b = compute(&monthly).unwrap();
                assert_close(a.total_repayment, b.total_repayment, 1e-6);
                assert_close(a.total_interest, b.total_interest, 1e-6);
                assert_close(a.monthly_installment, b.monthly_installment, 1e-6);
            }
        }
    }

    #[test]
    fn test_more_frequent_compounding_never_costs_less() {
        let base = LoanCalculationInput::new(
            50000.,
            12.,
            RateBasis::Yearly,
            3,
            DurationUnit::Years,
            Compounding::Yearly,
        );
        let repayments: Vec<f64> = [
            Compounding::Yearly,
            Compounding::Monthly,
            Compounding::Weekly,
            Compounding::Daily,
        ]
        .iter()
        .map(|&compounding| {
            compute(&LoanCalculationInput {
                compounding,
                ..base
            })
            .unwrap()
            .total_repayment
        })
        .collect();

        for pair in repayments.windows(2) {
            assert!(pair[1] >= pair[0], "{} < {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_installment_spreads_total_over_months() {
        for (duration, unit) in [
            (1, DurationUnit::Months),
            (7, DurationUnit::Months),
            (13, DurationUnit::Months),
            (1, DurationUnit::Years),
            (25, DurationUnit::Years),
        ] {
            let input = LoanCalculationInput::new(
                75000.,
                1.5,
                RateBasis::Monthly,
                duration,
                unit,
                Compounding::Daily,
            );
            let result = compute(&input).unwrap();
            let months = input.years() * 12.;
            assert_close(
                result.monthly_installment * months,
                result.total_repayment,
                1e-6 * result.total_repayment,
            );
        }
    }

    #[test]
    fn test_input_normalization() {
        let input = LoanCalculationInput::new(
            1000.,
            2.,
            RateBasis::Monthly,
            3,
            DurationUnit::Years,
            Compounding::Weekly,
        );
        assert_eq!(input.annual_rate(), 24.);
        assert_eq!(input.periods_per_year(), 52.);
        assert_eq!(input.years(), 3.);
        assert_eq!(input.duration_in_months(), 36);

        let input = LoanCalculationInput {
            duration: 18,
            duration_unit: DurationUnit::Months,
            compounding: Compounding::Daily,
            ..input
        };
        assert_eq!(input.years(), 1.5);
        assert_eq!(input.duration_in_months(), 18);
        assert_eq!(input.periods_per_year(), 365.);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let base = LoanCalculationInput::default();

        let zero_principal = LoanCalculationInput {
            principal: 0.,
            ..base
        };
        assert_eq!(field_of(compute(&zero_principal).unwrap_err()), "principal");

        let negative_principal = LoanCalculationInput {
            principal: -10.,
            ..base
        };
        assert_eq!(field_of(compute(&negative_principal).unwrap_err()), "principal");

        let nan_principal = LoanCalculationInput {
            principal: f64::NAN,
            ..base
        };
        assert_eq!(field_of(compute(&nan_principal).unwrap_err()), "principal");

        let huge_principal = LoanCalculationInput {
            principal: MAX_PRINCIPAL * 10.,
            ..base
        };
        assert_eq!(field_of(compute(&huge_principal).unwrap_err()), "principal");

        let negative_rate = LoanCalculationInput {
            nominal_rate: -0.5,
            ..base
        };
        assert_eq!(field_of(compute(&negative_rate).unwrap_err()), "nominal_rate");

        let huge_monthly_rate = LoanCalculationInput {
            nominal_rate: 100.,
            rate_basis: RateBasis::Monthly,
            ..base
        };
        assert_eq!(field_of(compute(&huge_monthly_rate).unwrap_err()), "nominal_rate");

        let zero_duration = LoanCalculationInput {
            duration: 0,
            ..base
        };
        assert_eq!(field_of(compute(&zero_duration).unwrap_err()), "duration");

        let century_and_a_year = LoanCalculationInput {
            duration: 101,
            duration_unit: DurationUnit::Years,
            ..base
        };
        assert_eq!(field_of(compute(&century_and_a_year).unwrap_err()), "duration");
    }

    #[test]
    fn test_rejects_overflowing_compound_amount() {
        let input = LoanCalculationInput::new(
            1000.,
            1000.,
            RateBasis::Yearly,
            100,
            DurationUnit::Years,
            Compounding::Daily,
        );
        assert_eq!(field_of(validate(&input).unwrap_err()), "nominal_rate");

        // same ceiling values stay finite with yearly compounding
        let input = LoanCalculationInput {
            principal: 1e12,
            compounding: Compounding::Yearly,
            ..input
        };
        let result = compute(&input).unwrap();
        assert!(result.total_repayment.is_finite());
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Yearly".parse::<RateBasis>().unwrap(), RateBasis::Yearly);
        assert_eq!("monthly".parse::<RateBasis>().unwrap(), RateBasis::Monthly);
        assert_eq!("YEARS".parse::<DurationUnit>().unwrap(), DurationUnit::Years);
        assert_eq!("months".parse::<DurationUnit>().unwrap(), DurationUnit::Months);
        assert_eq!("weekly".parse::<Compounding>().unwrap(), Compounding::Weekly);
        assert_eq!("Daily".parse::<Compounding>().unwrap(), Compounding::Daily);

        assert_eq!(
            field_of("hourly".parse::<Compounding>().unwrap_err()),
            "compounding"
        );
        assert_eq!(field_of("weeks".parse::<DurationUnit>().unwrap_err()), "duration_unit");
        assert_eq!(field_of("daily".parse::<RateBasis>().unwrap_err()), "rate_basis");
    }

    #[test]
    fn test_result_display() {
        let result = compute(&LoanCalculationInput::default()).unwrap();
        assert_eq!(
            result.to_string(),
            "monthly installment 920.59, total interest 1047.13, total repayment 11047.13"
        );
    }
}
