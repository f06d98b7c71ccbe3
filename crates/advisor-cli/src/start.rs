//! `advisor start`: demo run over sample deals and a sample agent.

use anyhow::Result;
use chrono::NaiveDate;

use advisor_core::{
    calculate_rewards, classify, AgentRecord, Amount, Classification, Deal, DealSource,
    FiscalCalendar, Region, RewardOutcome,
};

use crate::output::{render_classification, render_outcome};

/// Sample deals dated April to September of `year`, which all fall in
/// fiscal year `year` under the default April start.
pub fn sample_deals(year: i32) -> Vec<Deal> {
    let on = |month, day| NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    vec![
        Deal::new(Amount::from_major(15_000_000), DealSource::SelfDiscovered, on(4, 10)),
        Deal::new(Amount::from_major(8_000_000), DealSource::HqReferral, on(5, 20)),
        Deal::new(Amount::from_major(10_000_000), DealSource::SelfDiscovered, on(7, 1)),
        Deal::new(Amount::from_major(5_000_000), DealSource::PartnerOffer, on(9, 15)),
    ]
}

pub fn sample_agent() -> AgentRecord {
    AgentRecord::new(Region::Capital, Amount::from_major(12_000_000), 5)
}

pub fn demo(today: NaiveDate) -> (RewardOutcome, Classification) {
    let fiscal_year = FiscalCalendar::default().fiscal_year(today);
    let outcome = calculate_rewards(&sample_deals(fiscal_year), Amount::ZERO);
    let classification = classify(&sample_agent());
    (outcome, classification)
}

pub fn run_start(today: NaiveDate) -> Result<u8> {
    let (outcome, classification) = demo(today);
    println!("== Sample reward calculation ==");
    print!("{}", render_outcome(&outcome));
    println!();
    println!("== Sample agent (capital, 12,000,000 sales, 5 cases) ==");
    print!("{}", render_classification(&classification));
    Ok(0)
}
