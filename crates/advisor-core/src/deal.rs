//! # Deals
//!
//! A [`Deal`] is one commission-bearing transaction: the tax-excluded
//! brokerage fee, where the lead came from, and the settlement date. Deals
//! are immutable once constructed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AdvisorError;
use crate::money::Amount;

/// Where a deal originated. Determines the reward rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealSource {
    /// Found by the agent. Eligible for the bonus stage.
    SelfDiscovered,
    /// Referred by headquarters.
    HqReferral,
    /// Offered through the partner platform.
    PartnerOffer,
}

impl DealSource {
    /// All sources in canonical order.
    pub fn all() -> &'static [DealSource] {
        &[Self::SelfDiscovered, Self::HqReferral, Self::PartnerOffer]
    }

    /// Canonical snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfDiscovered => "self_discovered",
            Self::HqReferral => "hq_referral",
            Self::PartnerOffer => "partner_offer",
        }
    }
}

impl fmt::Display for DealSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealSource {
    type Err = AdvisorError;

    /// Parse a canonical name or one of the short aliases used by older
    /// clients. Listing-platform leads (`picks`) count as self-discovered.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "self_discovered" | "self-discovered" | "self" | "picks" => Ok(Self::SelfDiscovered),
            "hq_referral" | "hq-referral" | "hq" => Ok(Self::HqReferral),
            "partner_offer" | "partner-offer" | "offer" => Ok(Self::PartnerOffer),
            other => Err(AdvisorError::invalid(format!(
                "unknown deal source: {other:?}"
            ))),
        }
    }
}

impl Serialize for DealSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DealSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single commission-bearing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "tax_excluded_fee")]
    fee: Amount,
    source: DealSource,
    date: NaiveDate,
}

impl Deal {
    pub fn new(fee: Amount, source: DealSource, date: NaiveDate) -> Self {
        Self { fee, source, date }
    }

    /// Build a deal from untyped adapter input.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] if the fee is negative or
    /// malformed, the source is unknown, or the date is not `YYYY-MM-DD`.
    pub fn parse(fee: &str, source: &str, date: &str) -> Result<Self, AdvisorError> {
        Ok(Self {
            fee: Amount::parse(fee)?,
            source: source.parse()?,
            date: parse_date(date)?,
        })
    }

    /// Tax-excluded brokerage fee.
    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn source(&self) -> DealSource {
        self.source
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AdvisorError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| AdvisorError::invalid(format!("malformed date {raw:?}: {e}")))
}
