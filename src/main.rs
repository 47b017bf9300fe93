use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use break_planner::config::{Cli, Command, ProjectArgs};
use break_planner::core::{Currency, format_amount, project_monthly_path};
use break_planner::state::{InputStore, JsonFileStore, MemoryStore, ProjectionState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            info!("Starting break planner v{}", env!("CARGO_PKG_VERSION"));
            break_planner::api::run_http_server(args.socket_addr())
                .await
                .context("HTTP server failed")?;
        }
        Command::Project(args) => match args.state_dir.clone() {
            Some(dir) => {
                let store = JsonFileStore::new(&dir)
                    .with_context(|| format!("cannot open state directory {}", dir.display()))?;
                run_projection(ProjectionState::load(store), &args)?;
            }
            None => run_projection(ProjectionState::load(MemoryStore::new()), &args)?,
        },
    }

    Ok(())
}

fn run_projection<S: InputStore>(mut state: ProjectionState<S>, args: &ProjectArgs) -> Result<()> {
    let updates = args.inputs.updates();
    if !updates.is_empty() {
        let mut inputs = state.inputs().clone();
        for update in updates {
            update.apply_to(&mut inputs);
        }
        if let Err(e) = inputs.validate() {
            bail!("invalid inputs: {e}");
        }
        state.set_inputs(inputs);
    }

    if args.json {
        let output = serde_json::json!({
            "inputs": state.inputs(),
            "result": state.result(),
            "duration": state.duration(),
            "edgeCase": state.edge_case(),
            "months": args.trace.then(|| project_monthly_path(state.inputs())),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let currency: Currency = args.currency.into();
    let result = state.result();
    let duration = state.duration();
    println!("Savings today:        {}", format_amount(result.current_amount, currency));
    println!("Corpus at break:      {}", format_amount(result.amount_at_break, currency));
    println!("Age at break:         {}", result.age_at_break);
    println!("Corpus runs out at:   {}", result.corpus_runs_out_age);
    println!("Break lasts:          {} {}", duration.primary, duration.unit);
    println!("Left when it ends:    {}", format_amount(result.remaining_amount, currency));
    println!("Outcome:              {:?}", state.edge_case());

    if args.trace {
        println!();
        println!("{:>6} {:>8} {:>18} {:>18}", "month", "age", "expense", "corpus");
        for month in project_monthly_path(state.inputs()) {
            println!(
                "{:>6} {:>8.2} {:>18} {:>18}",
                month.month,
                month.age,
                format_amount(month.expense, currency),
                format_amount(month.corpus_end, currency)
            );
        }
    }

    Ok(())
}
