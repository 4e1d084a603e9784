use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tokio::sync::OnceCell;

use crate::config::Endpoints;
use crate::scrapers::types::SearchQuery;

/// Latitude/longitude pair read from a listing's detail page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/{},{}",
            self.latitude, self.longitude
        )
    }
}

/// One listing extracted from a search results page.
///
/// Every field is fixed at extraction time. The only exception is the
/// geolocation, which is fetched on first request and then kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub(crate) id: String,
    pub(crate) posted_at: NaiveDateTime,
    pub(crate) detail_url: String,
    pub(crate) title: String,
    /// `0` when the listing shows no price; see `price_listed`.
    pub(crate) price: u64,
    pub(crate) price_listed: bool,
    pub(crate) city: String,
    pub(crate) neighborhood: String,
    pub(crate) image_refs: Vec<String>,
    #[serde(
        serialize_with = "serialize_geolocation",
        deserialize_with = "deserialize_geolocation",
        default
    )]
    pub(crate) geolocation: OnceCell<GeoPoint>,
}

fn serialize_geolocation<S: Serializer>(
    cell: &OnceCell<GeoPoint>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    cell.get().serialize(serializer)
}

fn deserialize_geolocation<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<OnceCell<GeoPoint>, D::Error> {
    Ok(OnceCell::new_with(Option::<GeoPoint>::deserialize(deserializer)?))
}

impl Record {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn posted_at(&self) -> NaiveDateTime {
        self.posted_at
    }

    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Listed price in whole dollars, or `0` when the listing has none.
    ///
    /// A real zero price and a missing price both read `0`; check
    /// [`Record::price_listed`] to tell them apart.
    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn price_listed(&self) -> bool {
        self.price_listed
    }

    /// City token of the query that produced this record
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    /// Opaque image ids; index 0 is the primary thumbnail.
    pub fn image_refs(&self) -> &[String] {
        &self.image_refs
    }

    pub fn image_urls(&self, endpoints: &Endpoints) -> Vec<String> {
        self.image_refs
            .iter()
            .map(|id| endpoints.image_url(id))
            .collect()
    }

    /// Geolocation if it has already been resolved
    pub fn geolocation(&self) -> Option<GeoPoint> {
        self.geolocation.get().copied()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} | ${}",
            self.city, self.neighborhood, self.title, self.price
        )
    }
}

/// Ordered records produced by one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    query: SearchQuery,
    started_at: NaiveDateTime,
    records: Vec<Record>,
}

impl ResultSet {
    pub(crate) fn new(query: SearchQuery, started_at: NaiveDateTime, records: Vec<Record>) -> Self {
        Self {
            query,
            started_at,
            records,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Wall-clock time the search started; the lookback cutoff is measured from here.
    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
