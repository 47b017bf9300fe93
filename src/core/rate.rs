use super::types::RateConvention;

/// Converts an annual percentage into a monthly decimal rate.
///
/// Total over the reals: zero and negative rates pass straight through the arithmetic.
pub fn monthly_rate(annual_rate_percent: f64, convention: RateConvention) -> f64 {
    match convention {
        RateConvention::Effective => (1.0 + annual_rate_percent / 100.0).powf(1.0 / 12.0) - 1.0,
        RateConvention::Nominal => annual_rate_percent / 100.0 / 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-12;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn nominal_rate_divides_by_twelve() {
        assert_approx(monthly_rate(12.0, RateConvention::Nominal), 0.01);
        assert_approx(monthly_rate(0.0, RateConvention::Nominal), 0.0);
        assert_approx(monthly_rate(-6.0, RateConvention::Nominal), -0.005);
    }

    #[test]
    fn effective_rate_is_below_nominal_for_positive_rates() {
        let effective = monthly_rate(12.0, RateConvention::Effective);
        let nominal = monthly_rate(12.0, RateConvention::Nominal);
        assert!(effective < nominal);
        assert_approx(effective, 1.12f64.powf(1.0 / 12.0) - 1.0);
    }

    #[test]
    fn zero_rate_is_zero_under_both_conventions() {
        assert_eq!(monthly_rate(0.0, RateConvention::Effective), 0.0);
        assert_eq!(monthly_rate(0.0, RateConvention::Nominal), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_effective_rate_compounds_back_to_annual(rate_bp in -5_000i32..20_000) {
            let annual = rate_bp as f64 / 100.0;
            let monthly = monthly_rate(annual, RateConvention::Effective);
            let compounded = (1.0 + monthly).powi(12);
            prop_assert!((compounded - (1.0 + annual / 100.0)).abs() <= 1e-9);
        }
    }
}
