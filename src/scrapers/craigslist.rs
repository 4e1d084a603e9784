use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::ScoutConfig;
use crate::error::Result;
use crate::models::{GeoPoint, Record, ResultSet};
use crate::scrapers::directory::{parse_directory, Directory};
use crate::scrapers::geo::parse_geolocation;
use crate::scrapers::http::ReqwestTransport;
use crate::scrapers::markup::Markup;
use crate::scrapers::page::{
    fetch_ok, pages_needed, search_request, ListingPage, PageOutcome, PAGE_SIZE,
};
use crate::scrapers::traits::{HttpRequest, Transport};
use crate::scrapers::types::SearchQuery;

/// Craigslist for-sale scraper
pub struct CraigslistScraper {
    transport: Arc<dyn Transport>,
    config: ScoutConfig,
    markup: Markup,
}

impl CraigslistScraper {
    /// Create a scraper that talks to the live site over HTTP
    pub fn new(config: ScoutConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(config, transport)
    }

    /// Create a scraper on top of any transport
    pub fn with_transport(config: ScoutConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            config,
            markup: Markup::new()?,
        })
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Run a search, measuring the lookback from now.
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        self.search_from(query, Local::now().naive_local()).await
    }

    /// Run a search whose lookback cutoff is measured from `started_at`.
    ///
    /// Pages are fetched one after another in feed order. The crawl stops
    /// at the first record older than the cutoff, and any failure discards
    /// everything collected so far.
    pub async fn search_from(&self, query: &SearchQuery, started_at: NaiveDateTime) -> Result<ResultSet> {
        let cutoff = query.lookback.cutoff(started_at);
        let mut records = Vec::new();

        info!(
            "Searching {} for '{}' (sort {}, lookback {:?})",
            query.city, query.text, query.sort, query.lookback
        );

        let body = self.fetch_search_page(query, 0).await?;
        let (total_count, outcome) = {
            let page = ListingPage::parse(&body);
            let total_count = page.total_count(&self.markup)?;
            if total_count == 0 {
                info!("No listings match '{}' in {}", query.text, query.city);
                return Ok(ResultSet::new(query.clone(), started_at, records));
            }
            let outcome = page.collect_records(&self.markup, &query.city, cutoff, &mut records)?;
            (total_count, outcome)
        };

        let pages = pages_needed(total_count);
        info!("{} listings reported across {} page(s)", total_count, pages);

        if outcome == PageOutcome::Exhausted {
            for page_index in 1..pages {
                let body = self.fetch_search_page(query, page_index * PAGE_SIZE).await?;
                let outcome = ListingPage::parse(&body).collect_records(
                    &self.markup,
                    &query.city,
                    cutoff,
                    &mut records,
                )?;
                if outcome == PageOutcome::CutoffReached {
                    debug!("Cutoff reached on page {}", page_index);
                    break;
                }
            }
        } else {
            debug!("Cutoff reached on first page");
        }

        info!("Collected {} records for '{}' in {}", records.len(), query.text, query.city);
        Ok(ResultSet::new(query.clone(), started_at, records))
    }

    async fn fetch_search_page(&self, query: &SearchQuery, offset: u64) -> Result<String> {
        debug!("Fetching search page at offset {}", offset);
        let request = search_request(&self.config, query, offset);
        let response = fetch_ok(self.transport.as_ref(), &request).await?;
        Ok(response.text())
    }

    /// Coordinates of a record, fetched from its detail page on first use.
    ///
    /// Later calls on the same record return the stored value without a
    /// request. A failure leaves the record unresolved.
    pub async fn geolocate(&self, record: &Record) -> Result<GeoPoint> {
        let point = record
            .geolocation
            .get_or_try_init(|| self.fetch_geolocation(record.detail_url()))
            .await?;
        Ok(*point)
    }

    async fn fetch_geolocation(&self, detail_url: &str) -> Result<GeoPoint> {
        debug!("Resolving geolocation from {}", detail_url);
        let request = HttpRequest::get(detail_url, self.config.headers());
        let response = fetch_ok(self.transport.as_ref(), &request).await?;
        parse_geolocation(&self.markup, &response.text())
    }

    /// City slugs listed as nearby on `city`'s home page
    pub async fn nearby_cities(&self, city: &str) -> Result<Vec<String>> {
        self.lookup(&Directory::Nearby {
            city: city.to_string(),
        })
        .await
    }

    /// City slugs with a site in `state` (two-letter postal code)
    pub async fn cities_by_state(&self, state: &str) -> Result<Vec<String>> {
        self.lookup(&Directory::State {
            state: state.to_string(),
        })
        .await
    }

    /// Fetch one directory page and read the city slugs off it.
    pub async fn lookup(&self, directory: &Directory) -> Result<Vec<String>> {
        let url = match directory {
            Directory::Nearby { city } => self.config.endpoints.city_home_url(city),
            Directory::State { state } => self.config.endpoints.state_directory_url(state),
        };
        let request = HttpRequest::get(url, self.config.headers());
        let response = fetch_ok(self.transport.as_ref(), &request).await?;
        let cities = parse_directory(directory.markup(&self.markup), &response.text())?;
        info!("Found {} cities in {:?}", cities.len(), directory);
        Ok(cities)
    }

    /// Raw bytes of one thumbnail
    pub async fn download_image(&self, image_id: &str) -> Result<Vec<u8>> {
        let request = HttpRequest::get(self.config.endpoints.image_url(image_id), self.config.headers());
        let response = fetch_ok(self.transport.as_ref(), &request).await?;
        Ok(response.body)
    }

    /// Thumbnails of a record as `(index, bytes)`, at most `max` of them.
    ///
    /// Images the server refuses are skipped; the index still refers to
    /// the position in [`Record::image_refs`].
    pub async fn download_images(&self, record: &Record, max: Option<usize>) -> Result<Vec<(usize, Vec<u8>)>> {
        let limit = max.unwrap_or(usize::MAX);
        let mut images = Vec::new();

        for (index, image_id) in record.image_refs().iter().enumerate().take(limit) {
            let request = HttpRequest::get(self.config.endpoints.image_url(image_id), self.config.headers());
            let response = self.transport.get(&request).await?;
            if response.status == 200 {
                images.push((index, response.body));
            } else {
                warn!(
                    "Skipping image {} of record {}: status {}",
                    image_id,
                    record.id(),
                    response.status
                );
            }
        }

        Ok(images)
    }
}
