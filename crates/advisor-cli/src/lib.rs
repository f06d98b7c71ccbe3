//! # advisor-cli: Command-Line Front End
//!
//! Provides the `advisor` binary over the `advisor-core` rule engine.
//!
//! ## Subcommands
//!
//! - `advisor start`: demo run over sample deals and a sample agent.
//! - `advisor reward`: rewards for an ordered batch of deals.
//! - `advisor simulate`: what-if for one prospective deal.
//! - `advisor classify`: agent tier and gap to the next tier.
//! - `advisor ledger`: fiscal-year ledger over a deal file.
//! - `advisor menu`: numbered interactive menu on stdin/stdout.
//!
//! ```bash
//! advisor reward --deal 15000000:self:2025-04-01 --deal 10000000:self
//! advisor simulate --fee 5,000,000 --source offer --ytd 18000000 --json
//! advisor classify --region capital --sales 12000000 --cases 5
//! advisor ledger --file deals.yaml --fiscal-year 2025
//! ```
//!
//! Every `run_*` handler returns the process exit code on success; errors
//! propagate as `anyhow::Error` and are logged by `main`.

pub mod classify;
pub mod deals;
pub mod ledger;
pub mod menu;
pub mod output;
pub mod reward;
pub mod start;
