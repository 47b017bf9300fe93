use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::Currency;
use crate::state::InputUpdate;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "break_planner",
    version,
    about = "Career-break planner: how long will savings last once the paycheck stops"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one projection and print it.
    Project(ProjectArgs),
    /// Serve the playground HTTP API.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
    #[arg(long, value_enum, default_value_t = CliCurrency::Inr)]
    pub currency: CliCurrency,
    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,
    #[arg(long, help = "Also print every simulated drawdown month")]
    pub trace: bool,
    #[arg(
        long,
        env = "BREAK_PLANNER_STATE_DIR",
        help = "Directory to load and save inputs; flags override stored values"
    )]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "BREAK_PLANNER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(long, env = "BREAK_PLANNER_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Projection inputs from flags. Unset flags keep the stored (or default) value.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    #[arg(long, help = "Current age in years [default: 26]")]
    pub current_age: Option<f64>,
    #[arg(long, help = "Years until the break starts [default: 4]")]
    pub start_break_in: Option<f64>,
    #[arg(long, help = "Current savings [default: 250000]")]
    pub current_savings: Option<f64>,
    #[arg(long, help = "Monthly savings until the break [default: 50000]")]
    pub monthly_savings: Option<f64>,
    #[arg(long, help = "Monthly expense during the break [default: 40000]")]
    pub monthly_expense: Option<f64>,
    #[arg(long, help = "Annual return before the break in percent [default: 12]")]
    pub return_rate_accumulation: Option<f64>,
    #[arg(long, help = "Annual return during the break in percent [default: 8]")]
    pub return_rate_spending: Option<f64>,
    #[arg(long, help = "Annual expense increase in percent [default: 5]")]
    pub expense_increase_rate: Option<f64>,
    #[arg(
        long,
        action = clap::ArgAction::Set,
        value_name = "BOOL",
        help = "Convert annual rates by compounding (true) or division by 12 (false) [default: true]"
    )]
    pub use_effective_rate: Option<bool>,
    #[arg(
        long,
        action = clap::ArgAction::Set,
        value_name = "BOOL",
        help = "Invest monthly savings at month end instead of month start [default: false]"
    )]
    pub invest_at_month_end: Option<bool>,
}

impl InputArgs {
    pub fn updates(&self) -> Vec<InputUpdate> {
        let mut updates = Vec::new();
        if let Some(v) = self.current_age {
            updates.push(InputUpdate::CurrentAge(v));
        }
        if let Some(v) = self.start_break_in {
            updates.push(InputUpdate::StartBreakIn(v));
        }
        if let Some(v) = self.current_savings {
            updates.push(InputUpdate::CurrentSavings(v));
        }
        if let Some(v) = self.monthly_savings {
            updates.push(InputUpdate::MonthlySavings(v));
        }
        if let Some(v) = self.monthly_expense {
            updates.push(InputUpdate::MonthlyExpense(v));
        }
        if let Some(v) = self.return_rate_accumulation {
            updates.push(InputUpdate::ReturnRateAccumulation(v));
        }
        if let Some(v) = self.return_rate_spending {
            updates.push(InputUpdate::ReturnRateSpending(v));
        }
        if let Some(v) = self.expense_increase_rate {
            updates.push(InputUpdate::ExpenseIncreaseRate(v));
        }
        if let Some(v) = self.use_effective_rate {
            updates.push(InputUpdate::UseEffectiveRate(v));
        }
        if let Some(v) = self.invest_at_month_end {
            updates.push(InputUpdate::InvestAtMonthEnd(v));
        }
        updates
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCurrency {
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Inr => Currency::Inr,
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Eur => Currency::Eur,
            CliCurrency::Gbp => Currency::Gbp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RetirementInputs;
    use crate::state::{INPUTS_STORAGE_KEY, MemoryStore, ProjectionState};

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn project_flags_become_field_updates() {
        let cli = Cli::try_parse_from([
            "break_planner",
            "project",
            "--current-age",
            "35",
            "--monthly-expense",
            "20000",
            "--use-effective-rate",
            "false",
            "--currency",
            "usd",
        ])
        .expect("valid args");

        let Command::Project(args) = cli.command else {
            panic!("expected project command");
        };
        assert_eq!(Currency::from(args.currency), Currency::Usd);

        let mut inputs = RetirementInputs::default();
        for update in args.inputs.updates() {
            update.apply_to(&mut inputs);
        }
        assert_eq!(inputs.current_age, 35.0);
        assert_eq!(inputs.monthly_expense, 20_000.0);
        assert!(!inputs.use_effective_rate);
        assert!(!inputs.invest_at_month_end);
        assert_eq!(inputs.start_break_in, 4.0);
    }

    #[test]
    fn boolean_flags_can_restore_stored_values() {
        let store = MemoryStore::with_entry(
            INPUTS_STORAGE_KEY,
            r#"{"useEffectiveRate": false, "investAtMonthEnd": true}"#,
        );
        let mut state = ProjectionState::load(store);
        assert!(!state.inputs().use_effective_rate);
        assert!(state.inputs().invest_at_month_end);

        let cli = Cli::try_parse_from([
            "break_planner",
            "project",
            "--use-effective-rate",
            "true",
            "--invest-at-month-end",
            "false",
        ])
        .expect("valid args");
        let Command::Project(args) = cli.command else {
            panic!("expected project command");
        };
        for update in args.inputs.updates() {
            state.update_input(update);
        }

        assert_eq!(state.inputs(), &RetirementInputs::default());
        let reloaded = ProjectionState::load(state.store().clone());
        assert!(reloaded.inputs().use_effective_rate);
        assert!(!reloaded.inputs().invest_at_month_end);
    }

    #[test]
    fn boolean_flags_require_a_value() {
        assert!(Cli::try_parse_from(["break_planner", "project", "--use-effective-rate"]).is_err());
    }

    #[test]
    fn unset_flags_produce_no_updates() {
        assert!(InputArgs::default().updates().is_empty());
    }

    #[test]
    fn serve_defaults_to_all_interfaces() {
        let cli = Cli::try_parse_from(["break_planner", "serve", "--port", "9000"])
            .expect("valid args");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.socket_addr().port(), 9000);
        assert!(args.socket_addr().ip().is_unspecified());
    }
}
