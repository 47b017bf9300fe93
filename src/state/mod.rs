//! Reactive holder for the playground inputs.
//!
//! Every mutation recomputes the projection synchronously and writes the inputs back to the
//! injected [`InputStore`]. Persistence is best-effort: a failed write is logged and the
//! in-memory state stays authoritative.

mod store;

pub use store::{InputStore, JsonFileStore, MemoryStore};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::{
    CalculationResult, DurationDisplay, EdgeCase, RetirementInputs, calculate_retirement,
    classify, format_duration,
};

/// Storage key the inputs are saved under.
pub const INPUTS_STORAGE_KEY: &str = "break-calculator-inputs";

/// A single-field edit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputUpdate {
    CurrentAge(f64),
    StartBreakIn(f64),
    CurrentSavings(f64),
    MonthlySavings(f64),
    MonthlyExpense(f64),
    ReturnRateAccumulation(f64),
    ReturnRateSpending(f64),
    ExpenseIncreaseRate(f64),
    UseEffectiveRate(bool),
    InvestAtMonthEnd(bool),
}

impl InputUpdate {
    pub fn apply_to(self, inputs: &mut RetirementInputs) {
        match self {
            InputUpdate::CurrentAge(v) => inputs.current_age = v,
            InputUpdate::StartBreakIn(v) => inputs.start_break_in = v,
            InputUpdate::CurrentSavings(v) => inputs.current_savings = v,
            InputUpdate::MonthlySavings(v) => inputs.monthly_savings = v,
            InputUpdate::MonthlyExpense(v) => inputs.monthly_expense = v,
            InputUpdate::ReturnRateAccumulation(v) => inputs.return_rate_accumulation = v,
            InputUpdate::ReturnRateSpending(v) => inputs.return_rate_spending = v,
            InputUpdate::ExpenseIncreaseRate(v) => inputs.expense_increase_rate = v,
            InputUpdate::UseEffectiveRate(v) => inputs.use_effective_rate = v,
            InputUpdate::InvestAtMonthEnd(v) => inputs.invest_at_month_end = v,
        }
    }
}

/// Partial inputs: every field optional, applied over some base set of inputs. Accepts the
/// web client's camelCase keys and the snake_case keys of older clients.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputPatch {
    #[serde(alias = "current_age")]
    pub current_age: Option<f64>,
    #[serde(alias = "start_break_in")]
    pub start_break_in: Option<f64>,
    #[serde(alias = "current_savings")]
    pub current_savings: Option<f64>,
    #[serde(alias = "monthly_savings")]
    pub monthly_savings: Option<f64>,
    #[serde(alias = "monthly_expense")]
    pub monthly_expense: Option<f64>,
    #[serde(alias = "return_rate_accumulation")]
    pub return_rate_accumulation: Option<f64>,
    #[serde(alias = "return_rate_spending")]
    pub return_rate_spending: Option<f64>,
    #[serde(alias = "expense_increase_rate")]
    pub expense_increase_rate: Option<f64>,
    #[serde(alias = "use_effective_rate")]
    pub use_effective_rate: Option<bool>,
    #[serde(alias = "invest_at_month_end")]
    pub invest_at_month_end: Option<bool>,
}

impl InputPatch {
    pub fn updates(&self) -> Vec<InputUpdate> {
        let fields = [
            self.current_age.map(InputUpdate::CurrentAge),
            self.start_break_in.map(InputUpdate::StartBreakIn),
            self.current_savings.map(InputUpdate::CurrentSavings),
            self.monthly_savings.map(InputUpdate::MonthlySavings),
            self.monthly_expense.map(InputUpdate::MonthlyExpense),
            self.return_rate_accumulation
                .map(InputUpdate::ReturnRateAccumulation),
            self.return_rate_spending.map(InputUpdate::ReturnRateSpending),
            self.expense_increase_rate.map(InputUpdate::ExpenseIncreaseRate),
            self.use_effective_rate.map(InputUpdate::UseEffectiveRate),
            self.invest_at_month_end.map(InputUpdate::InvestAtMonthEnd),
        ];
        fields.into_iter().flatten().collect()
    }

    /// Returns `base` with every present field replaced.
    pub fn apply_over(&self, mut base: RetirementInputs) -> RetirementInputs {
        for update in self.updates() {
            update.apply_to(&mut base);
        }
        base
    }
}

pub struct ProjectionState<S: InputStore> {
    store: S,
    inputs: RetirementInputs,
    result: CalculationResult,
    runs_out_age_changed: bool,
}

impl<S: InputStore> ProjectionState<S> {
    /// Restores inputs from `store`, filling any missing fields with defaults.
    pub fn load(store: S) -> Self {
        let inputs = load_inputs(&store);
        let result = calculate_retirement(&inputs);
        Self {
            store,
            inputs,
            result,
            runs_out_age_changed: false,
        }
    }

    pub fn inputs(&self) -> &RetirementInputs {
        &self.inputs
    }

    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn update_input(&mut self, update: InputUpdate) {
        let mut inputs = self.inputs.clone();
        update.apply_to(&mut inputs);
        self.set_inputs(inputs);
    }

    pub fn set_inputs(&mut self, inputs: RetirementInputs) {
        let result = calculate_retirement(&inputs);
        self.runs_out_age_changed = result.corpus_runs_out_age != self.result.corpus_runs_out_age;
        if self.runs_out_age_changed {
            debug!(
                from = self.result.corpus_runs_out_age,
                to = result.corpus_runs_out_age,
                "corpus run-out age changed"
            );
        }
        self.inputs = inputs;
        self.result = result;
        self.persist();
    }

    pub fn reset(&mut self) {
        self.set_inputs(RetirementInputs::default());
    }

    pub fn years_after_break(&self) -> f64 {
        self.result.years_after_break()
    }

    pub fn duration(&self) -> DurationDisplay {
        format_duration(self.years_after_break())
    }

    pub fn edge_case(&self) -> EdgeCase {
        classify(&self.inputs, &self.result)
    }

    /// True when the last edit moved the run-out age. Cleared by [`Self::acknowledge_change`].
    pub fn runs_out_age_changed(&self) -> bool {
        self.runs_out_age_changed
    }

    pub fn acknowledge_change(&mut self) {
        self.runs_out_age_changed = false;
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.inputs) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize inputs: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(INPUTS_STORAGE_KEY, &json) {
            warn!("failed to persist inputs: {e}");
        }
    }
}

fn load_inputs<S: InputStore>(store: &S) -> RetirementInputs {
    let stored = match store.load(INPUTS_STORAGE_KEY) {
        Ok(Some(stored)) => stored,
        Ok(None) => return RetirementInputs::default(),
        Err(e) => {
            warn!("failed to read stored inputs, using defaults: {e}");
            return RetirementInputs::default();
        }
    };

    serde_json::from_str(&stored).unwrap_or_else(|e| {
        warn!("stored inputs are unreadable, using defaults: {e}");
        RetirementInputs::default()
    })
}
