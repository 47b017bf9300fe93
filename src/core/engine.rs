use super::rate::monthly_rate;
use super::types::{CalculationResult, ContributionTiming, DrawdownMonth, RetirementInputs};

/// Hard stop for the drawdown loop: 100 years of months.
pub const MAX_SPENDING_MONTHS: u32 = 100 * 12;

#[derive(Debug, Clone, Copy)]
struct DrawdownOutcome {
    months: u32,
    corpus: f64,
}

/// Runs the two-phase projection: accumulation up to the break, then a monthly drawdown
/// until the corpus can no longer cover a full month's expense.
pub fn calculate_retirement(inputs: &RetirementInputs) -> CalculationResult {
    let amount_at_break = accumulate_until_break(inputs);
    let age_at_break = inputs.current_age + inputs.start_break_in;
    let outcome = run_drawdown(inputs, amount_at_break, age_at_break, |_| {});
    let years_in_spending = outcome.months as f64 / 12.0;

    CalculationResult {
        current_amount: inputs.current_savings,
        amount_at_break: round_half_up(amount_at_break),
        age_at_break,
        corpus_runs_out_age: round_to_tenth(age_at_break + years_in_spending),
        remaining_amount: round_half_up(outcome.corpus).max(0.0),
    }
}

/// Month-by-month view of the drawdown phase. Same loop as [`calculate_retirement`], so the
/// number of rows always equals the months counted there.
pub fn project_monthly_path(inputs: &RetirementInputs) -> Vec<DrawdownMonth> {
    let amount_at_break = accumulate_until_break(inputs);
    let age_at_break = inputs.current_age + inputs.start_break_in;
    let mut path = Vec::new();
    run_drawdown(inputs, amount_at_break, age_at_break, |month| path.push(month));
    path
}

fn accumulate_until_break(inputs: &RetirementInputs) -> f64 {
    let months_until_break = inputs.start_break_in * 12.0;
    let rate = monthly_rate(inputs.return_rate_accumulation, inputs.rate_convention());

    if months_until_break == 0.0 {
        return inputs.current_savings;
    }
    if rate == 0.0 {
        return inputs.current_savings + inputs.monthly_savings * months_until_break;
    }

    let growth = (1.0 + rate).powf(months_until_break);
    let fv_lump_sum = inputs.current_savings * growth;
    let ordinary_annuity = inputs.monthly_savings * (growth - 1.0) / rate;
    let fv_annuity = match inputs.contribution_timing() {
        ContributionTiming::MonthEnd => ordinary_annuity,
        ContributionTiming::MonthStart => ordinary_annuity * (1.0 + rate),
    };

    fv_lump_sum + fv_annuity
}

// The affordability check runs before each month, so the last executed month can leave the
// corpus negative. Callers clamp only when reporting.
fn run_drawdown(
    inputs: &RetirementInputs,
    amount_at_break: f64,
    age_at_break: f64,
    mut on_month: impl FnMut(DrawdownMonth),
) -> DrawdownOutcome {
    let rate = monthly_rate(inputs.return_rate_spending, inputs.rate_convention());
    let yearly_expense_multiplier = 1.0 + inputs.expense_increase_rate / 100.0;

    let mut corpus = amount_at_break;
    let mut current_expense = inputs.monthly_expense;
    let mut months = 0u32;

    while corpus >= current_expense && months < MAX_SPENDING_MONTHS {
        corpus *= 1.0 + rate;
        corpus -= current_expense;
        months += 1;

        on_month(DrawdownMonth {
            month: months,
            age: age_at_break + months as f64 / 12.0,
            expense: current_expense,
            corpus_end: corpus,
        });

        if months % 12 == 0 {
            current_expense *= yearly_expense_multiplier;
        }
    }

    DrawdownOutcome { months, corpus }
}

/// Rounds .5 towards positive infinity. Only exact ties move up.
pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if rounded - value == -0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}
