//! Deal input: `FEE:SOURCE[:DATE]` arguments and JSON/YAML deal files.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use advisor_core::deal::parse_date;
use advisor_core::{AdvisorError, Amount, Deal, DealSource};

/// A deal given on the command line as `FEE:SOURCE[:DATE]`.
///
/// The date is optional and resolved against "today" by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealArg {
    pub fee: Amount,
    pub source: DealSource,
    pub date: Option<NaiveDate>,
}

impl DealArg {
    pub fn into_deal(self, today: NaiveDate) -> Deal {
        Deal::new(self.fee, self.source, self.date.unwrap_or(today))
    }
}

impl FromStr for DealArg {
    type Err = AdvisorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.splitn(3, ':');
        let fee = parts.next().unwrap_or_default();
        let source = parts.next().ok_or_else(|| {
            AdvisorError::invalid(format!("expected FEE:SOURCE[:DATE], got {raw:?}"))
        })?;
        let date = match parts.next().map(str::trim) {
            Some(d) if !d.is_empty() => Some(parse_date(d)?),
            _ => None,
        };
        Ok(Self {
            fee: fee.parse()?,
            source: source.parse()?,
            date,
        })
    }
}

fn default_source() -> DealSource {
    DealSource::SelfDiscovered
}

/// One deal as stored in a deal file.
#[derive(Debug, Clone, Deserialize)]
pub struct DealRecord {
    pub tax_excluded_fee: Amount,
    #[serde(default = "default_source")]
    pub source: DealSource,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl DealRecord {
    pub fn to_deal(&self, today: NaiveDate) -> Deal {
        Deal::new(self.tax_excluded_fee, self.source, self.date.unwrap_or(today))
    }
}

/// A deal file is either a bare list or `{ deals: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DealFile {
    List(Vec<DealRecord>),
    Wrapped { deals: Vec<DealRecord> },
}

impl DealFile {
    fn into_records(self) -> Vec<DealRecord> {
        match self {
            DealFile::List(records) | DealFile::Wrapped { deals: records } => records,
        }
    }
}

/// Load deal records from a `.json` file, or YAML for any other extension.
pub fn load_deal_file(path: &Path) -> Result<Vec<DealRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deal file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let file: DealFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON deal file {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML deal file {}", path.display()))?
    };

    let records = file.into_records();
    tracing::debug!(path = %path.display(), count = records.len(), "loaded deal file");
    Ok(records)
}
