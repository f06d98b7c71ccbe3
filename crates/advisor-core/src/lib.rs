//! # advisor-core: Commission Rule Engine
//!
//! Pure business rules for agent commission rewards and sales-tier
//! classification. Every other crate in the workspace consumes these rules
//! through the functions re-exported here; this crate depends on nothing
//! internal and performs no I/O.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed-point money.** [`Amount`] stores hundredths as integers and
//!    [`Rate`] stores basis points. Reward arithmetic never touches `f64`;
//!    floats appear only at adapter boundaries.
//!
//! 2. **Static rule tables.** Source rates and regional tier thresholds are
//!    ordered slices of tagged records, scanned once. Adding a tier or a
//!    source means adding a row, not a branch.
//!
//! 3. **Single error kind.** Every failure that can originate here is a
//!    caller-fixable [`AdvisorError::InvalidInput`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `advisor-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Engines are stateless and safe to call concurrently.

pub mod classification;
pub mod deal;
pub mod error;
pub mod ledger;
pub mod money;
pub mod reward;

pub use classification::{
    classify, tier_table, AgentClass, AgentRecord, Classification, Period, PromotionGap, Region,
    TierRule, TOP_TIER_MESSAGE,
};
pub use deal::{Deal, DealSource};
pub use error::AdvisorError;
pub use ledger::{FiscalCalendar, LedgerEntry, LedgerSummary, RewardLedger};
pub use money::{Amount, Rate};
pub use reward::{
    calculate_rewards, resolve_rate, simulate_reward, RewardDetail, RewardOutcome,
    RewardSimulation, BONUS_STAGE_THRESHOLD, RATE_HQ_REFERRAL, RATE_PARTNER_OFFER,
    RATE_SELF_BONUS, RATE_SELF_NORMAL,
};
