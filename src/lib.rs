//! Scraper for Craigslist for-sale search results.
//!
//! A search walks the paginated results index for one city, turns each
//! listing row into a [`Record`] and stops once listings get older than the
//! requested lookback. Coordinates for a record are fetched separately, on
//! demand, and kept on the record.

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;

pub use config::{Endpoints, ScoutConfig};
pub use error::{Result, ScrapeError};
pub use models::{GeoPoint, Record, ResultSet};
pub use scrapers::{CraigslistScraper, Directory, Lookback, SearchQuery, SortOrder};
