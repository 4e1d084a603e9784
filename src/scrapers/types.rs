use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering requested from the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAscending,
    PriceDescending,
}

impl SortOrder {
    /// Token understood by the `sort` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "rel",
            SortOrder::PriceAscending => "priceasc",
            SortOrder::PriceDescending => "pricedsc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rel" | "relevance" => Ok(SortOrder::Relevance),
            "priceasc" | "price-ascending" => Ok(SortOrder::PriceAscending),
            "pricedsc" | "price-descending" => Ok(SortOrder::PriceDescending),
            other => Err(format!(
                "unknown sort order '{other}', expected rel, priceasc or pricedsc"
            )),
        }
    }
}

/// Maximum age of a record relative to the start of the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    #[default]
    Unbounded,
    Days(u32),
}

impl Lookback {
    /// Oldest acceptable posting time, or `None` when nothing is too old.
    ///
    /// A window reaching past the earliest representable date has no cutoff.
    pub fn cutoff(&self, started_at: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Lookback::Unbounded => None,
            Lookback::Days(days) => {
                started_at.checked_sub_signed(Duration::days(i64::from(*days)))
            }
        }
    }
}

impl From<Option<u32>> for Lookback {
    fn from(days: Option<u32>) -> Self {
        days.map_or(Lookback::Unbounded, Lookback::Days)
    }
}

/// Parameters of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// City slug as used in the site's subdomain
    pub city: String,
    /// Free-text query as typed
    pub text: String,
    pub sort: SortOrder,
    pub lookback: Lookback,
}

impl SearchQuery {
    /// Builds a query, normalizing the city to its slug form.
    pub fn new(city: &str, text: &str, sort: SortOrder, lookback: Lookback) -> Self {
        Self {
            city: city_slug(city),
            text: text.to_string(),
            sort,
            lookback,
        }
    }

    /// Query text with each token percent-encoded and tokens joined by a literal `+`.
    pub fn encoded_text(&self) -> String {
        encode_query(&self.text)
    }
}

pub fn city_slug(city: &str) -> String {
    city.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Percent-encodes each whitespace-separated token and joins them with `+`.
///
/// Runs of whitespace count as one separator, so `"a  b"` gives `a+b`. The
/// site's own search box splits on single spaces and would send `a++b`.
pub fn encode_query(text: &str) -> String {
    text.split_whitespace()
        .map(|token| urlencoding::encode(token).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}
