//! # advisor CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use advisor_cli::classify::{run_classify, ClassifyArgs};
use advisor_cli::ledger::{run_ledger, LedgerArgs};
use advisor_cli::menu::run_menu;
use advisor_cli::reward::{run_reward, run_simulate, RewardArgs, SimulateArgs};
use advisor_cli::start::run_start;

/// Commission advisor CLI.
///
/// Calculates brokerage commission rewards, simulates prospective deals,
/// and classifies agents into performance tiers.
#[derive(Parser, Debug)]
#[command(name = "advisor", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Demo run over sample deals and a sample agent.
    Start,

    /// Calculate rewards for an ordered batch of deals.
    Reward(RewardArgs),

    /// What-if reward for one prospective deal.
    Simulate(SimulateArgs),

    /// Classify an agent into a performance tier.
    Classify(ClassifyArgs),

    /// Fiscal-year ledger over a deal file.
    Ledger(LedgerArgs),

    /// Interactive numbered menu.
    Menu,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let today = Local::now().date_naive();

    let result = match cli.command {
        Commands::Start => run_start(today),
        Commands::Reward(args) => run_reward(&args, today),
        Commands::Simulate(args) => run_simulate(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Ledger(args) => run_ledger(&args, today),
        Commands::Menu => {
            let stdin = std::io::stdin();
            run_menu(stdin.lock(), std::io::stdout().lock(), today).map(|()| 0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Amount, DealSource, Region};

    #[test]
    fn cli_parse_reward_with_repeated_deals() {
        let cli = Cli::try_parse_from([
            "advisor",
            "reward",
            "--deal",
            "15000000:self:2025-04-01",
            "--deal",
            "10,000,000:hq",
            "--ytd",
            "1000",
            "--json",
        ])
        .unwrap();
        let Commands::Reward(args) = cli.command else {
            panic!("expected reward");
        };
        assert_eq!(args.deals.len(), 2);
        assert_eq!(args.deals[1].source, DealSource::HqReferral);
        assert_eq!(args.ytd, Amount::from_major(1000));
        assert!(args.json);
    }

    #[test]
    fn cli_parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["advisor", "simulate", "--fee", "5000000"]).unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.source, DealSource::SelfDiscovered);
        assert_eq!(args.ytd, Amount::ZERO);
    }

    #[test]
    fn cli_parse_classify() {
        let cli = Cli::try_parse_from([
            "advisor", "-vv", "classify", "--region", "local", "--sales", "12000000", "--cases",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.region, Region::Other);
        assert_eq!(args.cases, 5);
    }

    #[test]
    fn cli_parse_ledger_defaults_to_april() {
        let cli = Cli::try_parse_from(["advisor", "ledger", "--file", "deals.yaml"]).unwrap();
        let Commands::Ledger(args) = cli.command else {
            panic!("expected ledger");
        };
        assert_eq!(args.start_month, 4);
        assert_eq!(args.fiscal_year, None);
    }

    #[test]
    fn cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["advisor", "simulate", "--fee", "-5"]).is_err());
        assert!(Cli::try_parse_from(["advisor", "simulate", "--fee", "1", "--source", "gift"]).is_err());
        assert!(Cli::try_parse_from(["advisor", "classify", "--region", "moon", "--sales", "1", "--cases", "1"]).is_err());
        assert!(Cli::try_parse_from(["advisor", "reward", "--deal", "100"]).is_err());
    }

    #[test]
    fn cli_parse_start_and_menu() {
        assert!(matches!(
            Cli::try_parse_from(["advisor", "start"]).unwrap().command,
            Commands::Start
        ));
        assert!(matches!(
            Cli::try_parse_from(["advisor", "menu"]).unwrap().command,
            Commands::Menu
        ));
    }
}
