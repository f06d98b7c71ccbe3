//! # Reward CLI
//!
//! ```bash
//! advisor reward --deal 15000000:self:2025-04-01 --deal 10000000:self
//! advisor reward --file deals.yaml --ytd 12000000 --json
//! advisor simulate --fee 5000000 --source offer --ytd 18000000
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;

use advisor_core::{calculate_rewards, simulate_reward, Amount, Deal, DealSource, RewardOutcome};

use crate::deals::{load_deal_file, DealArg};
use crate::output::{render_outcome, render_simulation, to_json};

/// Arguments for `advisor reward`.
#[derive(Args, Debug)]
pub struct RewardArgs {
    /// Deal as FEE:SOURCE[:DATE]. Repeatable; processed after any --file deals.
    #[arg(long = "deal", value_name = "FEE:SOURCE[:DATE]")]
    pub deals: Vec<DealArg>,

    /// JSON or YAML file holding a list of deals.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Fees already accumulated this year before the first deal.
    #[arg(long, value_name = "AMOUNT", default_value = "0")]
    pub ytd: Amount,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `advisor simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Tax-excluded fee of the prospective deal.
    #[arg(long, value_name = "AMOUNT")]
    pub fee: Amount,

    /// Deal source (self_discovered, hq_referral, partner_offer or an alias).
    #[arg(long, value_name = "SOURCE", default_value = "self")]
    pub source: DealSource,

    /// Year-to-date fee total before this deal.
    #[arg(long, value_name = "AMOUNT", default_value = "0")]
    pub ytd: Amount,

    #[arg(long)]
    pub json: bool,
}

/// Gather deals from `--file` then `--deal`, in that order.
pub fn collect_deals(args: &RewardArgs, today: NaiveDate) -> Result<Vec<Deal>> {
    let mut deals = Vec::new();
    if let Some(path) = &args.file {
        deals.extend(load_deal_file(path)?.iter().map(|r| r.to_deal(today)));
    }
    deals.extend(args.deals.iter().cloned().map(|d| d.into_deal(today)));
    if deals.is_empty() {
        bail!("no deals given; pass --deal FEE:SOURCE[:DATE] or --file PATH");
    }
    Ok(deals)
}

pub fn compute(args: &RewardArgs, today: NaiveDate) -> Result<RewardOutcome> {
    let deals = collect_deals(args, today)?;
    let outcome = calculate_rewards(&deals, args.ytd);
    tracing::info!(
        deals = deals.len(),
        total_reward = %outcome.total_reward,
        "rewards calculated"
    );
    Ok(outcome)
}

/// Execute `advisor reward`.
pub fn run_reward(args: &RewardArgs, today: NaiveDate) -> Result<u8> {
    let outcome = compute(args, today)?;
    if args.json {
        println!("{}", to_json(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(0)
}

/// Execute `advisor simulate`.
pub fn run_simulate(args: &SimulateArgs) -> Result<u8> {
    let sim = simulate_reward(args.fee, args.source, args.ytd);
    if args.json {
        println!("{}", to_json(&sim)?);
    } else {
        print!("{}", render_simulation(&sim));
    }
    Ok(0)
}
