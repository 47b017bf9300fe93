mod display;
mod engine;
mod rate;
mod types;

pub use display::{
    Currency, DurationDisplay, EdgeCase, NEVER_RUNS_OUT_YEARS, classify, format_amount,
    format_duration,
};
pub use engine::{
    MAX_SPENDING_MONTHS, calculate_retirement, project_monthly_path, round_half_up,
    round_to_tenth,
};
pub use rate::monthly_rate;
pub use types::{
    CalculationResult, ContributionTiming, DrawdownMonth, RateConvention, RetirementInputs,
};
