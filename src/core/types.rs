use serde::{Deserialize, Serialize};

/// Inputs for one career-break projection. Rates are annual percentages (12.0 means 12%).
///
/// Missing fields deserialize to the playground defaults, so older stored payloads keep
/// loading as new fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementInputs {
    #[serde(alias = "current_age")]
    pub current_age: f64,
    #[serde(alias = "start_break_in")]
    pub start_break_in: f64,
    #[serde(alias = "current_savings")]
    pub current_savings: f64,
    #[serde(alias = "monthly_savings")]
    pub monthly_savings: f64,
    #[serde(alias = "monthly_expense")]
    pub monthly_expense: f64,
    #[serde(alias = "return_rate_accumulation")]
    pub return_rate_accumulation: f64,
    #[serde(alias = "return_rate_spending")]
    pub return_rate_spending: f64,
    #[serde(alias = "expense_increase_rate")]
    pub expense_increase_rate: f64,
    #[serde(alias = "use_effective_rate")]
    pub use_effective_rate: bool,
    #[serde(alias = "invest_at_month_end")]
    pub invest_at_month_end: bool,
}

impl Default for RetirementInputs {
    fn default() -> Self {
        Self {
            current_age: 26.0,
            start_break_in: 4.0,
            current_savings: 250_000.0,
            monthly_savings: 50_000.0,
            monthly_expense: 40_000.0,
            return_rate_accumulation: 12.0,
            return_rate_spending: 8.0,
            expense_increase_rate: 5.0,
            use_effective_rate: true,
            invest_at_month_end: false,
        }
    }
}

impl RetirementInputs {
    pub fn rate_convention(&self) -> RateConvention {
        if self.use_effective_rate {
            RateConvention::Effective
        } else {
            RateConvention::Nominal
        }
    }

    pub fn contribution_timing(&self) -> ContributionTiming {
        if self.invest_at_month_end {
            ContributionTiming::MonthEnd
        } else {
            ContributionTiming::MonthStart
        }
    }

    /// Boundary checks for inputs arriving over the API or CLI. The engine itself accepts
    /// anything and never calls this.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(format!("{name} must be a finite number"));
            }
        }

        if !(0.0..=120.0).contains(&self.current_age) {
            return Err("currentAge must be between 0 and 120".to_string());
        }

        if !(0.0..=50.0).contains(&self.start_break_in) {
            return Err("startBreakIn must be between 0 and 50".to_string());
        }

        for (name, amount) in [
            ("currentSavings", self.current_savings),
            ("monthlySavings", self.monthly_savings),
            ("monthlyExpense", self.monthly_expense),
        ] {
            if amount < 0.0 {
                return Err(format!("{name} must be >= 0"));
            }
        }

        for (name, rate) in [
            ("returnRateAccumulation", self.return_rate_accumulation),
            ("returnRateSpending", self.return_rate_spending),
            ("expenseIncreaseRate", self.expense_increase_rate),
        ] {
            if !(0.0..=100.0).contains(&rate) {
                return Err(format!("{name} must be between 0 and 100"));
            }
        }

        Ok(())
    }

    fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("currentAge", self.current_age),
            ("startBreakIn", self.start_break_in),
            ("currentSavings", self.current_savings),
            ("monthlySavings", self.monthly_savings),
            ("monthlyExpense", self.monthly_expense),
            ("returnRateAccumulation", self.return_rate_accumulation),
            ("returnRateSpending", self.return_rate_spending),
            ("expenseIncreaseRate", self.expense_increase_rate),
        ]
    }
}

/// How an annual percentage is turned into a monthly rate.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RateConvention {
    /// `annual / 12`
    #[default]
    Nominal,
    /// Twelve monthly compoundings reproduce the annual rate.
    Effective,
}

/// When each monthly contribution lands during accumulation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContributionTiming {
    /// Annuity due.
    #[default]
    MonthStart,
    /// Ordinary annuity.
    MonthEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub current_amount: f64,
    pub amount_at_break: f64,
    pub age_at_break: f64,
    pub corpus_runs_out_age: f64,
    pub remaining_amount: f64,
}

impl CalculationResult {
    /// Years between the start of the break and the month the corpus runs short.
    pub fn years_after_break(&self) -> f64 {
        self.corpus_runs_out_age - self.age_at_break
    }
}

/// One simulated drawdown month, after growth and withdrawal were applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownMonth {
    pub month: u32,
    pub age: f64,
    pub expense: f64,
    pub corpus_end: f64,
}
