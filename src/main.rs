use std::fs;

use clap::Parser;
use homefin::api::{build_payoff_response, payoff_request_from_json, run_http_server};
use homefin::config::{Cli, Command, PayoffArgs};
use homefin::core::analyze_trend;
use homefin::telemetry::init_tracing;
use serde::Serialize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(config) => {
            init_tracing(config.log_json);
            run_http_server(&config)
                .await
                .map_err(|e| format!("Server error: {e}"))
        }
        Command::Payoff(args) => {
            init_tracing(false);
            run_payoff(&args)
        }
        Command::Trend(args) => print_json(&analyze_trend(&args.values)),
    };

    if let Err(msg) = result {
        eprintln!("{msg}");
        std::process::exit(1);
    }
}

fn run_payoff(args: &PayoffArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.file)
        .map_err(|e| format!("Cannot read {}: {e}", args.file.display()))?;
    let mut request = payoff_request_from_json(&raw)?;
    if let Some(extra) = args.extra {
        if !extra.is_finite() || extra < 0.0 {
            return Err("--extra must be >= 0".to_string());
        }
        request.extra_payment = extra;
    }
    if let Some(strategy) = args.strategy {
        request.strategy = strategy.into();
    }
    if args.summary {
        request.include_timeline = false;
    }
    let plan = build_payoff_response(&request);
    if !plan.completed {
        tracing::warn!("debts are not paid off within the simulation ceiling");
    }
    print_json(&plan)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| format!("Cannot encode output: {e}"))?;
    println!("{json}");
    Ok(())
}
