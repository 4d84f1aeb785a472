//! Universe catalog: the fixed list of entities a refresh pass covers.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use zero_common::config::UniverseEntry;

use crate::error::SentimentError;

/// A ranked entity (an equity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Ticker symbol, unique within a catalog
    pub symbol: String,
    /// Company display name
    pub display_name: String,
}

impl Entity {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
        }
    }
}

/// Major S&P 500 constituents, in catalog order.
const MAJOR_COMPANIES: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("BRK.B", "Berkshire Hathaway Inc."),
    ("V", "Visa Inc."),
    ("UNH", "UnitedHealth Group"),
    ("XOM", "Exxon Mobil Corporation"),
    ("JNJ", "Johnson & Johnson"),
    ("JPM", "JPMorgan Chase & Co."),
    ("WMT", "Walmart Inc."),
    ("MA", "Mastercard Incorporated"),
    ("PG", "Procter & Gamble Company"),
    ("HD", "Home Depot Inc."),
    ("CVX", "Chevron Corporation"),
    ("ABBV", "AbbVie Inc."),
    ("MRK", "Merck & Co. Inc."),
    ("KO", "Coca-Cola Company"),
    ("PEP", "PepsiCo Inc."),
    ("COST", "Costco Wholesale Corporation"),
    ("AVGO", "Broadcom Inc."),
    ("LLY", "Eli Lilly and Company"),
    ("TMO", "Thermo Fisher Scientific"),
    ("MCD", "McDonald's Corporation"),
    ("ACN", "Accenture plc"),
    ("CSCO", "Cisco Systems Inc."),
    ("ABT", "Abbott Laboratories"),
    ("DIS", "Walt Disney Company"),
    ("NKE", "Nike Inc."),
    ("NFLX", "Netflix Inc."),
    ("CRM", "Salesforce Inc."),
    ("VZ", "Verizon Communications"),
    ("ADBE", "Adobe Inc."),
    ("ORCL", "Oracle Corporation"),
    ("T", "AT&T Inc."),
    ("PFE", "Pfizer Inc."),
    ("INTC", "Intel Corporation"),
    ("CMCSA", "Comcast Corporation"),
    ("WFC", "Wells Fargo & Company"),
    ("AMD", "Advanced Micro Devices"),
    ("UPS", "United Parcel Service"),
    ("DHR", "Danaher Corporation"),
    ("TXN", "Texas Instruments"),
    ("BMY", "Bristol Myers Squibb"),
    ("QCOM", "QUALCOMM Incorporated"),
    ("PM", "Philip Morris International"),
    ("HON", "Honeywell International"),
    ("BA", "Boeing Company"),
    ("IBM", "IBM Corporation"),
    ("GE", "General Electric"),
    ("CAT", "Caterpillar Inc."),
    ("MMM", "3M Company"),
    ("SBUX", "Starbucks Corporation"),
    ("AXP", "American Express"),
    ("GS", "Goldman Sachs Group"),
    ("BLK", "BlackRock Inc."),
    ("C", "Citigroup Inc."),
    ("MS", "Morgan Stanley"),
    ("SCHW", "Charles Schwab Corporation"),
    ("CB", "Chubb Limited"),
    ("NOW", "ServiceNow Inc."),
    ("BKNG", "Booking Holdings Inc."),
    ("SYK", "Stryker Corporation"),
    ("GILD", "Gilead Sciences Inc."),
    ("ADP", "Automatic Data Processing"),
    ("MDLZ", "Mondelez International"),
    ("ISRG", "Intuitive Surgical Inc."),
    ("CI", "Cigna Group"),
    ("TJX", "TJX Companies Inc."),
    ("REGN", "Regeneron Pharmaceuticals"),
    ("SO", "Southern Company"),
    ("DUK", "Duke Energy Corporation"),
    ("PLD", "Prologis Inc."),
    ("SPGI", "S&P Global Inc."),
    ("ZTS", "Zoetis Inc."),
    ("USB", "U.S. Bancorp"),
    ("TGT", "Target Corporation"),
    ("BDX", "Becton Dickinson"),
    ("LRCX", "Lam Research Corporation"),
    ("MO", "Altria Group Inc."),
    ("CVS", "CVS Health Corporation"),
    ("RTX", "RTX Corporation"),
    ("LOW", "Lowe's Companies Inc."),
    ("DE", "Deere & Company"),
    ("AMT", "American Tower Corporation"),
    ("ELV", "Elevance Health Inc."),
    ("FI", "Fiserv Inc."),
    ("AMAT", "Applied Materials Inc."),
    ("SLB", "Schlumberger Limited"),
    ("NEE", "NextEra Energy Inc."),
    ("CHTR", "Charter Communications"),
    ("ETN", "Eaton Corporation"),
    ("MMC", "Marsh & McLennan Companies"),
    ("KLAC", "KLA Corporation"),
    ("PNC", "PNC Financial Services"),
    ("COP", "ConocoPhillips"),
];

/// Static entity catalog.
///
/// Loading never touches the network. Symbols are unique; a repeated symbol
/// keeps its first occurrence.
#[derive(Debug, Clone)]
pub struct UniverseCatalog {
    definition: Vec<Entity>,
}

impl Default for UniverseCatalog {
    fn default() -> Self {
        Self::curated()
    }
}

impl UniverseCatalog {
    /// The curated list of major S&P 500 constituents.
    pub fn curated() -> Self {
        Self::from_pairs(MAJOR_COMPANIES.iter().copied())
    }

    /// Build a catalog from `(symbol, name)` pairs.
    pub fn from_pairs<S, N>(pairs: impl IntoIterator<Item = (S, N)>) -> Self
    where
        S: Into<String>,
        N: Into<String>,
    {
        Self {
            definition: pairs
                .into_iter()
                .map(|(symbol, name)| Entity::new(symbol, name))
                .collect(),
        }
    }

    /// Build a catalog from configured universe entries.
    pub fn from_entries(entries: &[UniverseEntry]) -> Self {
        Self::from_pairs(entries.iter().map(|e| (e.symbol.as_str(), e.name.as_str())))
    }

    /// Configured universe when present, otherwise the curated list.
    pub fn from_config(entries: Option<&[UniverseEntry]>) -> Self {
        entries.map_or_else(Self::curated, Self::from_entries)
    }

    /// Load the catalog in deterministic order with duplicates removed.
    pub fn load(&self) -> Result<Vec<Entity>, SentimentError> {
        let mut seen = HashSet::new();
        let entities: Vec<Entity> = self
            .definition
            .iter()
            .filter(|e| seen.insert(e.symbol.as_str()))
            .cloned()
            .collect();

        if entities.is_empty() {
            return Err(SentimentError::EmptyCatalog);
        }

        Ok(entities)
    }

    /// Number of entries in the raw definition.
    pub fn len(&self) -> usize {
        self.definition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_empty()
    }
}

/// Pick `min(n, len)` entities at random, keeping their catalog order.
pub fn sample<R: Rng + ?Sized>(entities: &[Entity], n: usize, rng: &mut R) -> Vec<Entity> {
    if n >= entities.len() {
        return entities.to_vec();
    }

    let mut picked = index::sample(rng, entities.len(), n).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| entities[i].clone()).collect()
}
