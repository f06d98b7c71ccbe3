//! # Classification Engine
//!
//! Maps an agent's region, period sales and cumulative case count to a
//! performance tier, plus the gap to the next tier up.
//!
//! Each region has its own threshold table, ordered from most senior to
//! least senior. The engine scans the table once and picks the first row
//! whose sales *and* case thresholds are both met. An agent matching no row
//! is [`AgentClass::Unranked`] and is measured against the region's lowest
//! tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AdvisorError;
use crate::money::Amount;

/// Sales region. Capital thresholds are higher for every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Capital,
    Other,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[Self::Capital, Self::Other]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capital => "capital",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "capital" => Ok(Self::Capital),
            "other" | "local" => Ok(Self::Other),
            other => Err(AdvisorError::invalid(format!("unknown region: {other:?}"))),
        }
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Performance tier, most senior first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentClass {
    Premier,
    Senior,
    Expert,
    Lead,
    Unranked,
}

impl AgentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premier => "Premier",
            Self::Senior => "Senior",
            Self::Expert => "Expert",
            Self::Lead => "Lead",
            Self::Unranked => "Unranked",
        }
    }
}

impl fmt::Display for AgentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation period for a tier's sales threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Annual,
    Half,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Half => "half",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a regional tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierRule {
    pub class: AgentClass,
    pub period: Period,
    pub min_sales: Amount,
    pub min_cases: u32,
}

impl TierRule {
    const fn new(class: AgentClass, period: Period, min_sales: u64, min_cases: u32) -> Self {
        Self {
            class,
            period,
            min_sales: Amount::from_major(min_sales),
            min_cases,
        }
    }

    fn is_met_by(&self, record: &AgentRecord) -> bool {
        record.period_sales >= self.min_sales && record.cumulative_cases >= self.min_cases
    }
}

const CAPITAL_TIERS: [TierRule; 4] = [
    TierRule::new(AgentClass::Premier, Period::Annual, 30_000_000, 10),
    TierRule::new(AgentClass::Senior, Period::Half, 12_000_000, 5),
    TierRule::new(AgentClass::Expert, Period::Half, 8_000_000, 5),
    TierRule::new(AgentClass::Lead, Period::Half, 5_000_000, 5),
];

const OTHER_TIERS: [TierRule; 4] = [
    TierRule::new(AgentClass::Premier, Period::Annual, 25_000_000, 10),
    TierRule::new(AgentClass::Senior, Period::Half, 10_000_000, 5),
    TierRule::new(AgentClass::Expert, Period::Half, 6_000_000, 5),
    TierRule::new(AgentClass::Lead, Period::Half, 4_000_000, 5),
];

/// Tier thresholds for `region`, most senior first.
pub fn tier_table(region: Region) -> &'static [TierRule] {
    match region {
        Region::Capital => &CAPITAL_TIERS,
        Region::Other => &OTHER_TIERS,
    }
}

/// Input to [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub region: Region,
    pub period_sales: Amount,
    pub cumulative_cases: u32,
}

impl AgentRecord {
    pub fn new(region: Region, period_sales: Amount, cumulative_cases: u32) -> Self {
        Self {
            region,
            period_sales,
            cumulative_cases,
        }
    }
}

/// Distance from the current figures to a target tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromotionGap {
    pub target_sales: Amount,
    pub target_cases: u32,
    pub current_sales: Amount,
    pub current_cases: u32,
    pub sales_gap: Amount,
    pub cases_gap: u32,
    pub sales_achieved: bool,
    pub cases_achieved: bool,
    pub can_promote: bool,
}

impl PromotionGap {
    fn against(target: &TierRule, record: &AgentRecord) -> Self {
        let sales_achieved = record.period_sales >= target.min_sales;
        let cases_achieved = record.cumulative_cases >= target.min_cases;
        Self {
            target_sales: target.min_sales,
            target_cases: target.min_cases,
            current_sales: record.period_sales,
            current_cases: record.cumulative_cases,
            sales_gap: target.min_sales.saturating_sub(record.period_sales),
            cases_gap: target.min_cases.saturating_sub(record.cumulative_cases),
            sales_achieved,
            cases_achieved,
            can_promote: sales_achieved && cases_achieved,
        }
    }
}

/// Classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub class: AgentClass,
    /// Period of the matched tier. Absent for [`AgentClass::Unranked`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    pub next_class: Option<AgentClass>,
    pub gap: Option<PromotionGap>,
    /// Set only at the top tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub const TOP_TIER_MESSAGE: &str = "top tier reached";

/// Classify an agent against its region's tier table.
pub fn classify(record: &AgentRecord) -> Classification {
    let table = tier_table(record.region);
    let matched = table.iter().position(|rule| rule.is_met_by(record));

    let (class, period, next) = match matched {
        Some(idx) => {
            let rule = &table[idx];
            let next = idx.checked_sub(1).map(|above| &table[above]);
            (rule.class, Some(rule.period), next)
        }
        None => (AgentClass::Unranked, None, table.last()),
    };

    tracing::debug!(
        region = %record.region,
        sales = %record.period_sales,
        cases = record.cumulative_cases,
        class = %class,
        "agent classified"
    );

    match next {
        Some(target) => Classification {
            class,
            period,
            next_class: Some(target.class),
            gap: Some(PromotionGap::against(target, record)),
            message: None,
        },
        None => Classification {
            class,
            period,
            next_class: None,
            gap: None,
            message: Some(TOP_TIER_MESSAGE.to_string()),
        },
    }
}
