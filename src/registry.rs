//! Named playground calculators, discoverable by name and executable with JSON params.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::{RetirementInputs, calculate_retirement};
use crate::error::CalculatorError;
use crate::state::InputPatch;

pub trait Calculator: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn calculate(&self, params: Value) -> Result<Value, CalculatorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorInfo {
    pub name: String,
    pub description: String,
}

#[derive(Default)]
pub struct CalculatorRegistry {
    calculators: BTreeMap<&'static str, Box<dyn Calculator>>,
}

impl CalculatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every calculator this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BreakCalculator));
        registry
    }

    /// Adds a calculator, replacing any previous one registered under the same name.
    pub fn register(&mut self, calculator: Box<dyn Calculator>) {
        self.calculators.insert(calculator.name(), calculator);
    }

    pub fn get(&self, name: &str) -> Result<&dyn Calculator, CalculatorError> {
        self.calculators
            .get(name)
            .map(|calculator| &**calculator)
            .ok_or_else(|| CalculatorError::UnknownCalculator(name.to_string()))
    }

    pub fn list(&self) -> Vec<CalculatorInfo> {
        self.calculators
            .values()
            .map(|calculator| CalculatorInfo {
                name: calculator.name().to_string(),
                description: calculator.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    pub fn execute(&self, name: &str, params: Value) -> Result<Value, CalculatorError> {
        self.get(name)?.calculate(params)
    }
}

/// Career-break projection: how long savings last once contributions stop.
///
/// Unlike the playground form, a generic caller gets zero for any age or amount it leaves
/// out. Only the rates and conventions fall back to the playground values.
pub struct BreakCalculator;

impl BreakCalculator {
    pub fn base_inputs() -> RetirementInputs {
        RetirementInputs {
            current_age: 0.0,
            start_break_in: 0.0,
            current_savings: 0.0,
            monthly_savings: 0.0,
            monthly_expense: 0.0,
            ..RetirementInputs::default()
        }
    }
}

impl Calculator for BreakCalculator {
    fn name(&self) -> &'static str {
        "break"
    }

    fn description(&self) -> &'static str {
        "Calculate how long your savings will last during a career break"
    }

    fn calculate(&self, params: Value) -> Result<Value, CalculatorError> {
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        let patch: InputPatch = serde_json::from_value(params)
            .map_err(|e| CalculatorError::InvalidParams(e.to_string()))?;
        let inputs = patch.apply_over(Self::base_inputs());
        inputs.validate().map_err(CalculatorError::InvalidParams)?;

        serde_json::to_value(calculate_retirement(&inputs))
            .map_err(|e| CalculatorError::Internal(e.to_string()))
    }
}
