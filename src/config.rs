use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::PayoffStrategy;

#[derive(Parser, Debug)]
#[command(
    name = "homefin",
    version,
    about = "Household finance calculators: debt payoff, goals, cashflow and trend reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON HTTP API.
    Serve(ServeConfig),
    /// Simulate a debt payoff plan from a JSON file.
    Payoff(PayoffArgs),
    /// Classify the trend of a series of values.
    Trend(TrendArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[arg(long, env = "HOMEFIN_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,
    #[arg(long, env = "HOMEFIN_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "HOMEFIN_LOG_JSON",
        default_value_t = false,
        help = "Emit logs as JSON lines instead of human-readable text"
    )]
    pub log_json: bool,
    #[arg(
        long,
        env = "HOMEFIN_EXTRA_PAYMENT",
        default_value_t = 0.0,
        help = "Monthly extra payment used for the registered debts' payoff plan"
    )]
    pub extra_payment: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPayoffStrategy {
    Avalanche,
    Snowball,
}

impl From<CliPayoffStrategy> for PayoffStrategy {
    fn from(value: CliPayoffStrategy) -> Self {
        match value {
            CliPayoffStrategy::Avalanche => PayoffStrategy::Avalanche,
            CliPayoffStrategy::Snowball => PayoffStrategy::Snowball,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PayoffArgs {
    #[arg(long, help = "JSON file shaped like the /api/debts/payoff request body")]
    pub file: PathBuf,
    #[arg(long, help = "Override the file's extraPayment")]
    pub extra: Option<f64>,
    #[arg(long, value_enum, help = "Override the file's strategy")]
    pub strategy: Option<CliPayoffStrategy>,
    #[arg(long, default_value_t = false, help = "Omit the month-by-month timeline")]
    pub summary: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TrendArgs {
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults_apply_without_flags() {
        let cli = Cli::try_parse_from(["homefin", "serve"]).expect("valid args");
        let Command::Serve(config) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind.to_string(), "0.0.0.0");
        assert_eq!(config.extra_payment, 0.0);
    }

    #[test]
    fn payoff_args_parse_strategy_and_overrides() {
        let cli = Cli::try_parse_from([
            "homefin",
            "payoff",
            "--file",
            "debts.json",
            "--extra",
            "125.5",
            "--strategy",
            "snowball",
            "--summary",
        ])
        .expect("valid args");
        let Command::Payoff(args) = cli.command else {
            panic!("expected payoff command");
        };
        assert_eq!(args.file, PathBuf::from("debts.json"));
        assert_eq!(args.extra, Some(125.5));
        assert_eq!(args.strategy.map(PayoffStrategy::from), Some(PayoffStrategy::Snowball));
        assert!(args.summary);
    }

    #[test]
    fn trend_accepts_negative_values() {
        let cli = Cli::try_parse_from(["homefin", "trend", "100", "-20", "80"]).expect("valid args");
        let Command::Trend(args) = cli.command else {
            panic!("expected trend command");
        };
        assert_eq!(args.values, vec![100.0, -20.0, 80.0]);
    }

    #[test]
    fn trend_requires_values() {
        assert!(Cli::try_parse_from(["homefin", "trend"]).is_err());
    }
}
