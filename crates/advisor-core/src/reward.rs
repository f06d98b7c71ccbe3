//! # Reward Engine
//!
//! Maps an ordered batch of deals to per-deal rewards.
//!
//! ## Rate Schedule
//!
//! | Source          | Base   | Bonus stage |
//! |-----------------|--------|-------------|
//! | self_discovered | 75%    | 90%         |
//! | hq_referral     | 40%    | none        |
//! | partner_offer   | 55%    | none        |
//!
//! The bonus stage applies when the year-to-date fee total accumulated
//! *strictly before* the deal is at least [`BONUS_STAGE_THRESHOLD`]. Deals
//! are processed in the order given; the engine never re-sorts them.
//!
//! ## Determinism
//!
//! No internal state, no clock reads, fixed-point arithmetic only. Identical
//! inputs always produce identical outputs.

use serde::Serialize;

use crate::deal::{Deal, DealSource};
use crate::money::{Amount, Rate};

/// Year-to-date fee total at which self-discovered deals move to the bonus rate.
pub const BONUS_STAGE_THRESHOLD: Amount = Amount::from_major(20_000_000);

pub const RATE_SELF_NORMAL: Rate = Rate::from_bps(7_500);
pub const RATE_SELF_BONUS: Rate = Rate::from_bps(9_000);
pub const RATE_HQ_REFERRAL: Rate = Rate::from_bps(4_000);
pub const RATE_PARTNER_OFFER: Rate = Rate::from_bps(5_500);

/// One row of the rate schedule.
#[derive(Debug, Clone, Copy)]
struct RateSchedule {
    base: Rate,
    /// Rate once the bonus stage is reached. `None` for sources that never
    /// qualify.
    bonus: Option<Rate>,
}

fn schedule(source: DealSource) -> RateSchedule {
    match source {
        DealSource::SelfDiscovered => RateSchedule {
            base: RATE_SELF_NORMAL,
            bonus: Some(RATE_SELF_BONUS),
        },
        DealSource::HqReferral => RateSchedule {
            base: RATE_HQ_REFERRAL,
            bonus: None,
        },
        DealSource::PartnerOffer => RateSchedule {
            base: RATE_PARTNER_OFFER,
            bonus: None,
        },
    }
}

/// Resolve the rate for a deal given the YTD total accumulated before it.
///
/// Returns the rate and whether the bonus stage was applied.
pub fn resolve_rate(source: DealSource, ytd_before: Amount) -> (Rate, bool) {
    let row = schedule(source);
    match row.bonus {
        Some(bonus) if ytd_before >= BONUS_STAGE_THRESHOLD => (bonus, true),
        _ => (row.base, false),
    }
}

/// Reward computed for a single deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardDetail {
    pub deal: Deal,
    pub reward_amount: Amount,
    pub rate_applied: Rate,
    pub bonus_activated: bool,
    /// YTD fee total including this deal.
    pub year_to_date_after: Amount,
}

/// Result of a batch computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardOutcome {
    pub total_reward: Amount,
    pub details: Vec<RewardDetail>,
}

/// Compute rewards for `deals` in order, starting from `starting_ytd`.
///
/// The YTD total is advanced by each deal's fee only after that deal's
/// reward has been computed.
pub fn calculate_rewards(deals: &[Deal], starting_ytd: Amount) -> RewardOutcome {
    let mut ytd = starting_ytd;
    let mut details = Vec::with_capacity(deals.len());

    for deal in deals {
        let (rate, bonus) = resolve_rate(deal.source(), ytd);
        if bonus {
            tracing::debug!(
                fee = %deal.fee(),
                ytd_before = %ytd,
                "bonus stage applied"
            );
        }
        let reward_amount = rate.apply(deal.fee());
        ytd = ytd.saturating_add(deal.fee());

        details.push(RewardDetail {
            deal: deal.clone(),
            reward_amount,
            rate_applied: rate,
            bonus_activated: bonus,
            year_to_date_after: ytd,
        });
    }

    let total_reward = details.iter().map(|d| d.reward_amount).sum();
    RewardOutcome {
        total_reward,
        details,
    }
}

/// What-if result for a single prospective deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardSimulation {
    #[serde(rename = "tax_excluded_fee")]
    pub fee: Amount,
    pub source: DealSource,
    pub reward: Amount,
    pub rate: Rate,
    pub bonus_applied: bool,
    pub annual_total: Amount,
    pub new_annual_total: Amount,
    /// Whether this deal takes the YTD total to the bonus threshold.
    pub bonus_threshold_reached: bool,
}

/// Simulate one deal against a current YTD total without recording it.
pub fn simulate_reward(
    fee: Amount,
    source: DealSource,
    current_annual_total: Amount,
) -> RewardSimulation {
    let (rate, bonus_applied) = resolve_rate(source, current_annual_total);
    let new_annual_total = current_annual_total.saturating_add(fee);
    RewardSimulation {
        fee,
        source,
        reward: rate.apply(fee),
        rate,
        bonus_applied,
        annual_total: current_annual_total,
        new_annual_total,
        bonus_threshold_reached: new_annual_total >= BONUS_STAGE_THRESHOLD,
    }
}
