//! # Fiscal-Year Ledger
//!
//! A dated record of deals across fiscal years. Where
//! [`calculate_rewards`](crate::reward::calculate_rewards) takes the YTD
//! total from the caller, the ledger derives it: the YTD for a deal is the
//! sum of fees recorded in the same fiscal year and dated strictly earlier.
//! The bonus stage therefore resets when a new fiscal year begins.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::deal::Deal;
use crate::error::AdvisorError;
use crate::money::{Amount, Rate};
use crate::reward::resolve_rate;

/// Fiscal year boundaries. Defaults to an April start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalCalendar {
    start_month: u32,
}

impl FiscalCalendar {
    pub const DEFAULT_START_MONTH: u32 = 4;

    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] unless `start_month` is 1–12.
    pub fn new(start_month: u32) -> Result<Self, AdvisorError> {
        if !(1..=12).contains(&start_month) {
            return Err(AdvisorError::invalid(format!(
                "fiscal year start month must be 1-12, got {start_month}"
            )));
        }
        Ok(Self { start_month })
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    /// The fiscal year a date falls in, named by the calendar year in which
    /// it starts.
    pub fn fiscal_year(&self, date: NaiveDate) -> i32 {
        if date.month() >= self.start_month {
            date.year()
        } else {
            date.year() - 1
        }
    }
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self {
            start_month: Self::DEFAULT_START_MONTH,
        }
    }
}

/// A recorded deal with the reward it earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub deal: Deal,
    pub fiscal_year: i32,
    pub reward: Amount,
    pub rate_applied: Rate,
    pub bonus_applied: bool,
    pub annual_total_before: Amount,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Aggregates over ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    /// `None` when the summary spans every fiscal year.
    pub fiscal_year: Option<i32>,
    pub transaction_count: usize,
    pub total_commission: Amount,
    pub total_reward: Amount,
    pub bonus_applied_count: usize,
    /// `total_reward / total_commission`, or 0 with no commission.
    pub average_rate: f64,
}

/// Append-only ledger of rewarded deals.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    calendar: FiscalCalendar,
    entries: Vec<LedgerEntry>,
}

impl RewardLedger {
    pub fn new(calendar: FiscalCalendar) -> Self {
        Self {
            calendar,
            entries: Vec::new(),
        }
    }

    pub fn calendar(&self) -> FiscalCalendar {
        self.calendar
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Sum of fees recorded in `reference`'s fiscal year with a date
    /// strictly before `reference`.
    pub fn annual_total(&self, reference: NaiveDate) -> Amount {
        let fiscal_year = self.calendar.fiscal_year(reference);
        self.entries
            .iter()
            .filter(|e| e.fiscal_year == fiscal_year && e.deal.date() < reference)
            .map(|e| e.deal.fee())
            .sum()
    }

    /// Compute the reward for `deal` against its fiscal-year YTD and record it.
    pub fn record(&mut self, deal: Deal, description: impl Into<String>) -> LedgerEntry {
        let annual_total_before = self.annual_total(deal.date());
        let (rate, bonus_applied) = resolve_rate(deal.source(), annual_total_before);
        let entry = LedgerEntry {
            fiscal_year: self.calendar.fiscal_year(deal.date()),
            reward: rate.apply(deal.fee()),
            rate_applied: rate,
            bonus_applied,
            annual_total_before,
            description: description.into(),
            deal,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Fiscal years present in the ledger, ascending.
    pub fn fiscal_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries.iter().map(|e| e.fiscal_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Summarise one fiscal year, or every entry when `fiscal_year` is `None`.
    pub fn summary(&self, fiscal_year: Option<i32>) -> LedgerSummary {
        let selected: Vec<&LedgerEntry> = self
            .entries
            .iter()
            .filter(|e| fiscal_year.map_or(true, |fy| e.fiscal_year == fy))
            .collect();

        let total_commission: Amount = selected.iter().map(|e| e.deal.fee()).sum();
        let total_reward: Amount = selected.iter().map(|e| e.reward).sum();
        let average_rate = if total_commission.is_zero() {
            0.0
        } else {
            total_reward.minor() as f64 / total_commission.minor() as f64
        };

        LedgerSummary {
            fiscal_year,
            transaction_count: selected.len(),
            total_commission,
            total_reward,
            bonus_applied_count: selected.iter().filter(|e| e.bonus_applied).count(),
            average_rate,
        }
    }
}
