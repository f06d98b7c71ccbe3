//! Text rendering for command results.
//!
//! Renderers return `String` so handlers decide where output goes and tests
//! can assert on it. `--json` output goes through [`to_json`] instead.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use advisor_core::{
    Classification, LedgerEntry, LedgerSummary, RewardOutcome, RewardSimulation,
    BONUS_STAGE_THRESHOLD,
};

/// Pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_outcome(outcome: &RewardOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<15}  {:>16}  {:>7}  {:>16}  {:>16}",
        "Date", "Source", "Fee", "Rate", "Reward", "YTD after"
    );
    for d in &outcome.details {
        let _ = writeln!(
            out,
            "{:<10}  {:<15}  {:>16}  {:>7}  {:>16}  {:>16}{}",
            d.deal.date().to_string(),
            d.deal.source().as_str(),
            d.deal.fee().grouped(),
            d.rate_applied.to_string(),
            d.reward_amount.grouped(),
            d.year_to_date_after.grouped(),
            if d.bonus_activated { "  bonus" } else { "" }
        );
    }
    let _ = writeln!(out, "Total reward: {}", outcome.total_reward.grouped());
    out
}

pub fn render_simulation(sim: &RewardSimulation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fee:              {}", sim.fee.grouped());
    let _ = writeln!(out, "Source:           {}", sim.source);
    let _ = writeln!(out, "Rate:             {}", sim.rate);
    let _ = writeln!(out, "Reward:           {}", sim.reward.grouped());
    let _ = writeln!(
        out,
        "Bonus applied:    {}",
        if sim.bonus_applied { "yes" } else { "no" }
    );
    let _ = writeln!(
        out,
        "Annual total:     {} -> {}",
        sim.annual_total.grouped(),
        sim.new_annual_total.grouped()
    );
    if sim.bonus_threshold_reached {
        let _ = writeln!(
            out,
            "Bonus stage reached ({} threshold).",
            BONUS_STAGE_THRESHOLD.grouped()
        );
    } else {
        let _ = writeln!(
            out,
            "Remaining to bonus stage: {}",
            BONUS_STAGE_THRESHOLD
                .saturating_sub(sim.new_annual_total)
                .grouped()
        );
    }
    out
}

pub fn render_classification(c: &Classification) -> String {
    let mut out = String::new();
    match c.period {
        Some(period) => {
            let _ = writeln!(out, "Class: {} ({period})", c.class);
        }
        None => {
            let _ = writeln!(out, "Class: {}", c.class);
        }
    }
    if let Some(message) = &c.message {
        let _ = writeln!(out, "{message}");
    }
    if let (Some(next), Some(gap)) = (c.next_class, &c.gap) {
        let _ = writeln!(out, "Next class: {next}");
        let _ = writeln!(
            out,
            "  Sales: {} / {} (gap {})",
            gap.current_sales.grouped(),
            gap.target_sales.grouped(),
            gap.sales_gap.grouped()
        );
        let _ = writeln!(
            out,
            "  Cases: {} / {} (gap {})",
            gap.current_cases, gap.target_cases, gap.cases_gap
        );
        if gap.can_promote {
            let _ = writeln!(out, "  Eligible for promotion.");
        }
    }
    out
}

pub fn render_ledger(entries: &[&LedgerEntry], summaries: &[LedgerSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}  {:<10}  {:<15}  {:>16}  {:>7}  {:>16}  Description",
        "FY", "Date", "Source", "Fee", "Rate", "Reward"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:<4}  {:<10}  {:<15}  {:>16}  {:>7}  {:>16}  {}{}",
            e.fiscal_year,
            e.deal.date().to_string(),
            e.deal.source().as_str(),
            e.deal.fee().grouped(),
            e.rate_applied.to_string(),
            e.reward.grouped(),
            e.description,
            if e.bonus_applied { " [bonus]" } else { "" }
        );
    }
    for s in summaries {
        let _ = writeln!(out);
        match s.fiscal_year {
            Some(fy) => {
                let _ = writeln!(out, "Fiscal year {fy}");
            }
            None => {
                let _ = writeln!(out, "All fiscal years");
            }
        }
        let _ = writeln!(out, "  Transactions:     {}", s.transaction_count);
        let _ = writeln!(out, "  Total commission: {}", s.total_commission.grouped());
        let _ = writeln!(out, "  Total reward:     {}", s.total_reward.grouped());
        let _ = writeln!(out, "  Bonus deals:      {}", s.bonus_applied_count);
        let _ = writeln!(out, "  Average rate:     {:.2}%", s.average_rate * 100.0);
    }
    out
}
