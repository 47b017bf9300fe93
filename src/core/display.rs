//! Presentation-only derivations over a projection. Nothing here feeds back into the engine.

use serde::{Deserialize, Serialize};

use super::types::{CalculationResult, RetirementInputs};

/// Projections at or beyond this many years are shown as "never runs out".
pub const NEVER_RUNS_OUT_YEARS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationDisplay {
    pub primary: String,
    pub unit: String,
}

impl DurationDisplay {
    fn new(primary: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            unit: unit.into(),
        }
    }
}

/// Splits a duration in years into whole years plus rounded leftover months.
///
/// A single unit collapses into `primary` + `unit` ("6" "months", "2" "years"); mixed
/// durations use the compact form "3y 6m" with an empty unit.
pub fn format_duration(years_after_break: f64) -> DurationDisplay {
    let years_after_break = years_after_break.max(0.0);
    let mut years = years_after_break.floor() as u32;
    let mut months = ((years_after_break - years as f64) * 12.0).round() as u32;
    if months == 12 {
        years += 1;
        months = 0;
    }

    match (years, months) {
        (0, months) => DurationDisplay::new(months.to_string(), unit_label(months, "month")),
        (years, 0) => DurationDisplay::new(years.to_string(), unit_label(years, "year")),
        (years, months) => DurationDisplay::new(format!("{years}y {months}m"), ""),
    }
}

fn unit_label(count: u32, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeCase {
    Empty,
    NoExpenses,
    InsufficientSavings,
    NeverRunsOut,
    RunsOutImmediately,
    Normal,
}

/// Picks the display branch for a projection. First match wins.
pub fn classify(inputs: &RetirementInputs, result: &CalculationResult) -> EdgeCase {
    let has_savings = inputs.current_savings > 0.0 || inputs.monthly_savings > 0.0;
    let has_expense = inputs.monthly_expense > 0.0;
    let years_after_break = result.years_after_break();

    if !has_savings && !has_expense {
        EdgeCase::Empty
    } else if !has_expense {
        EdgeCase::NoExpenses
    } else if !has_savings {
        EdgeCase::InsufficientSavings
    } else if years_after_break >= NEVER_RUNS_OUT_YEARS {
        EdgeCase::NeverRunsOut
    } else if (years_after_break * 12.0).round() < 1.0 {
        EdgeCase::RunsOutImmediately
    } else {
        EdgeCase::Normal
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

/// Whole-unit amount with the currency's symbol and digit grouping
/// (lakh/crore for rupees, thousands otherwise).
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let grouped = match currency {
        Currency::Inr => group_indian(&digits),
        _ => group_thousands(&digits),
    };
    format!("{sign}{}{grouped}", currency.symbol())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (idx, ch) in head.chars().enumerate() {
        if idx > 0 && (head.len() - idx) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculate_retirement;

    fn duration(primary: &str, unit: &str) -> DurationDisplay {
        DurationDisplay::new(primary, unit)
    }

    #[test]
    fn format_duration_mixes_years_and_months() {
        assert_eq!(format_duration(3.5), duration("3y 6m", ""));
    }

    #[test]
    fn format_duration_collapses_to_months_under_a_year() {
        assert_eq!(format_duration(0.5), duration("6", "months"));
        assert_eq!(format_duration(1.0 / 12.0), duration("1", "month"));
        assert_eq!(format_duration(0.0), duration("0", "months"));
    }

    #[test]
    fn format_duration_collapses_to_years_on_whole_years() {
        assert_eq!(format_duration(2.0), duration("2", "years"));
        assert_eq!(format_duration(1.0), duration("1", "year"));
        assert_eq!(format_duration(100.0), duration("100", "years"));
    }

    #[test]
    fn format_duration_carries_twelve_rounded_months_into_a_year() {
        assert_eq!(format_duration(2.99), duration("3", "years"));
    }

    #[test]
    fn format_duration_treats_negative_as_zero() {
        assert_eq!(format_duration(-1.5), duration("0", "months"));
    }

    fn classify_inputs(inputs: &RetirementInputs) -> EdgeCase {
        classify(inputs, &calculate_retirement(inputs))
    }

    #[test]
    fn classify_detects_empty_inputs() {
        let inputs = RetirementInputs {
            current_savings: 0.0,
            monthly_savings: 0.0,
            monthly_expense: 0.0,
            ..RetirementInputs::default()
        };
        assert_eq!(classify_inputs(&inputs), EdgeCase::Empty);
    }

    #[test]
    fn classify_detects_missing_expense_before_cap() {
        let inputs = RetirementInputs {
            monthly_expense: 0.0,
            ..RetirementInputs::default()
        };
        assert_eq!(classify_inputs(&inputs), EdgeCase::NoExpenses);
    }

    #[test]
    fn classify_detects_insufficient_savings() {
        let inputs = RetirementInputs {
            current_savings: 0.0,
            monthly_savings: 0.0,
            ..RetirementInputs::default()
        };
        assert_eq!(classify_inputs(&inputs), EdgeCase::InsufficientSavings);
    }

    #[test]
    fn classify_detects_never_running_out() {
        let inputs = RetirementInputs {
            current_savings: 1.0e9,
            monthly_expense: 10_000.0,
            return_rate_spending: 10.0,
            ..RetirementInputs::default()
        };
        assert_eq!(classify_inputs(&inputs), EdgeCase::NeverRunsOut);
    }

    #[test]
    fn classify_detects_immediate_run_out() {
        let inputs = RetirementInputs {
            start_break_in: 0.0,
            current_savings: 10_000.0,
            monthly_expense: 40_000.0,
            ..RetirementInputs::default()
        };
        assert_eq!(classify_inputs(&inputs), EdgeCase::RunsOutImmediately);
    }

    #[test]
    fn classify_defaults_to_normal() {
        assert_eq!(
            classify_inputs(&RetirementInputs::default()),
            EdgeCase::Normal
        );
    }

    #[test]
    fn format_amount_uses_indian_grouping_for_rupees() {
        assert_eq!(format_amount(3_444_144.0, Currency::Inr), "₹34,44,144");
        assert_eq!(format_amount(999.0, Currency::Inr), "₹999");
        assert_eq!(format_amount(1_000.0, Currency::Inr), "₹1,000");
        assert_eq!(format_amount(12_345_678.4, Currency::Inr), "₹1,23,45,678");
    }

    #[test]
    fn format_amount_uses_thousands_grouping_elsewhere() {
        assert_eq!(format_amount(3_444_144.0, Currency::Usd), "$3,444,144");
        assert_eq!(format_amount(100.0, Currency::Gbp), "£100");
        assert_eq!(format_amount(-1_500.0, Currency::Eur), "-€1,500");
        assert_eq!(format_amount(0.0, Currency::Usd), "$0");
    }
}
