//! # Ledger CLI
//!
//! Records every deal of a deal file into a fiscal-year ledger, so the
//! bonus-stage YTD resets at each fiscal-year boundary, then prints the
//! entries and per-year summaries.
//!
//! ```bash
//! advisor ledger --file deals.yaml
//! advisor ledger --file deals.json --fiscal-year 2025 --start-month 1 --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use advisor_core::{FiscalCalendar, LedgerEntry, LedgerSummary, RewardLedger};

use crate::deals::load_deal_file;
use crate::output::{render_ledger, to_json};

#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// JSON or YAML file holding a list of deals.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Only report this fiscal year.
    #[arg(long, value_name = "YEAR")]
    pub fiscal_year: Option<i32>,

    /// First month of the fiscal year (1-12).
    #[arg(long, value_name = "M", default_value_t = FiscalCalendar::DEFAULT_START_MONTH)]
    pub start_month: u32,

    #[arg(long)]
    pub json: bool,
}

/// Ledger output for `--json`.
#[derive(Debug, Serialize)]
pub struct LedgerReport<'a> {
    pub entries: Vec<&'a LedgerEntry>,
    pub summaries: Vec<LedgerSummary>,
}

/// Build a ledger from the deal file in file order.
pub fn build_ledger(args: &LedgerArgs, today: NaiveDate) -> Result<RewardLedger> {
    let calendar = FiscalCalendar::new(args.start_month)?;
    let mut ledger = RewardLedger::new(calendar);
    for record in load_deal_file(&args.file)? {
        let entry = ledger.record(record.to_deal(today), record.description.clone());
        if entry.bonus_applied {
            tracing::debug!(
                fiscal_year = entry.fiscal_year,
                annual_total_before = %entry.annual_total_before,
                "bonus stage applied"
            );
        }
    }
    Ok(ledger)
}

/// Entries and summaries to show: one fiscal year, or every year plus a
/// grand total when the ledger spans several.
pub fn report(ledger: &RewardLedger, fiscal_year: Option<i32>) -> LedgerReport<'_> {
    let entries = ledger
        .entries()
        .iter()
        .filter(|e| fiscal_year.map_or(true, |fy| e.fiscal_year == fy))
        .collect();

    let summaries = match fiscal_year {
        Some(fy) => vec![ledger.summary(Some(fy))],
        None => {
            let years = ledger.fiscal_years();
            let mut summaries: Vec<LedgerSummary> =
                years.iter().map(|fy| ledger.summary(Some(*fy))).collect();
            if years.len() > 1 {
                summaries.push(ledger.summary(None));
            }
            summaries
        }
    };

    LedgerReport { entries, summaries }
}

pub fn run_ledger(args: &LedgerArgs, today: NaiveDate) -> Result<u8> {
    let ledger = build_ledger(args, today)?;
    let report = report(&ledger, args.fiscal_year);
    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_ledger(&report.entries, &report.summaries));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::Amount;

    const DEALS: &str = "\
- tax_excluded_fee: 15000000
  date: 2025-04-10
  description: first
- tax_excluded_fee: 10000000
  date: 2025-08-01
- tax_excluded_fee: 5000000
  date: 2025-09-01
- tax_excluded_fee: 3000000
  date: 2026-04-01
";

    fn ledger_args(dir: &tempfile::TempDir, start_month: u32) -> LedgerArgs {
        let path = dir.path().join("deals.yaml");
        std::fs::write(&path, DEALS).unwrap();
        LedgerArgs {
            file: path,
            fiscal_year: None,
            start_month,
            json: false,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    #[test]
    fn bonus_applies_within_fiscal_year_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(&ledger_args(&dir, 4), today()).unwrap();
        let entries = ledger.entries();
        assert_eq!(entries[0].description, "first");
        assert!(!entries[1].bonus_applied);
        assert!(entries[2].bonus_applied);
        assert_eq!(entries[2].reward, Amount::from_major(4_500_000));
        assert_eq!(entries[3].fiscal_year, 2026);
        assert!(!entries[3].bonus_applied);
    }

    #[test]
    fn report_adds_grand_total_across_years() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(&ledger_args(&dir, 4), today()).unwrap();

        let all = report(&ledger, None);
        assert_eq!(all.entries.len(), 4);
        assert_eq!(all.summaries.len(), 3);
        assert_eq!(all.summaries[2].fiscal_year, None);

        let fy = report(&ledger, Some(2025));
        assert_eq!(fy.entries.len(), 3);
        assert_eq!(fy.summaries.len(), 1);
        assert_eq!(fy.summaries[0].bonus_applied_count, 1);
    }

    #[test]
    fn invalid_start_month_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_ledger(&ledger_args(&dir, 13), today()).is_err());
    }
}
