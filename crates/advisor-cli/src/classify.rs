//! `advisor classify`: agent tier and gap to the next tier.

use anyhow::Result;
use clap::Args;

use advisor_core::{classify, AgentRecord, Amount, Region};

use crate::output::{render_classification, to_json};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// capital or other (alias local).
    #[arg(long, value_name = "REGION", default_value = "capital")]
    pub region: Region,

    /// Sales over the evaluation period.
    #[arg(long, value_name = "AMOUNT")]
    pub sales: Amount,

    /// Closed cases to date.
    #[arg(long, value_name = "N")]
    pub cases: u32,

    #[arg(long)]
    pub json: bool,
}

pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let classification = classify(&AgentRecord::new(args.region, args.sales, args.cases));
    if args.json {
        println!("{}", to_json(&classification)?);
    } else {
        print!("{}", render_classification(&classification));
    }
    Ok(0)
}
