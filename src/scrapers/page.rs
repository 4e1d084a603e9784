use chrono::NaiveDateTime;
use scraper::Html;
use tracing::{debug, warn};

use crate::config::ScoutConfig;
use crate::error::{Result, ScrapeError};
use crate::models::Record;
use crate::scrapers::listing::extract_record;
use crate::scrapers::markup::{text_of, Markup};
use crate::scrapers::traits::{HttpRequest, HttpResponse, Transport};
use crate::scrapers::types::SearchQuery;

/// Listings served per search results page
pub const PAGE_SIZE: u64 = 120;

/// Number of pages holding `total_count` listings
pub fn pages_needed(total_count: u64) -> u64 {
    total_count.div_ceil(PAGE_SIZE)
}

/// Request for the search page starting at `offset`.
///
/// Query and sort travel both in the URL and as parameters, which is what
/// the search index accepts. The URL form keeps the literal `+` between
/// query tokens.
pub fn search_request(config: &ScoutConfig, query: &SearchQuery, offset: u64) -> HttpRequest {
    let encoded = query.encoded_text();
    let sort = query.sort.as_param();
    let url = format!(
        "{}?query={}&sort={}",
        config.endpoints.search_url(&query.city),
        encoded,
        sort
    );

    let mut params = vec![
        ("sort".to_string(), sort.to_string()),
        ("query".to_string(), encoded),
    ];
    if offset > 0 {
        params.push(("s".to_string(), offset.to_string()));
    }

    HttpRequest {
        url,
        headers: config.headers(),
        params,
    }
}

/// Issues `request` and fails unless the server answers 200.
pub async fn fetch_ok(transport: &dyn Transport, request: &HttpRequest) -> Result<HttpResponse> {
    let response = transport.get(request).await?;
    if response.status != 200 {
        warn!("{} returned status: {}", request.url, response.status);
        return Err(ScrapeError::Status {
            url: request.url.clone(),
            status: response.status,
        });
    }
    Ok(response)
}

/// What happened while collecting one page's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Every row on the page was recent enough
    Exhausted,
    /// A row older than the cutoff was found; nothing after it was read
    CutoffReached,
}

/// A parsed search results page
pub struct ListingPage {
    document: Html,
}

impl ListingPage {
    pub fn parse(body: &str) -> Self {
        Self {
            document: Html::parse_document(body),
        }
    }

    /// Total matching listings reported by the page, `0` when it shows no count.
    pub fn total_count(&self, markup: &Markup) -> Result<u64> {
        let Some(marker) = self.document.select(&markup.total_count).next() else {
            return Ok(0);
        };
        let text = text_of(marker);
        text.trim()
            .replace(',', "")
            .parse::<u64>()
            .map_err(|_| ScrapeError::parse("total count", format!("non-numeric count '{}'", text.trim())))
    }

    /// Appends the page's records to `records` in document order.
    ///
    /// Stops at the first record posted before `cutoff`, which is not
    /// appended. Any extraction failure aborts the page.
    pub fn collect_records(
        &self,
        markup: &Markup,
        city: &str,
        cutoff: Option<NaiveDateTime>,
        records: &mut Vec<Record>,
    ) -> Result<PageOutcome> {
        for row in self.document.select(&markup.listing_row) {
            let record = extract_record(markup, city, row)?;
            if let Some(cutoff) = cutoff {
                if record.posted_at() < cutoff {
                    debug!(
                        "Record {} posted {} is older than cutoff {}",
                        record.id(),
                        record.posted_at(),
                        cutoff
                    );
                    return Ok(PageOutcome::CutoffReached);
                }
            }
            records.push(record);
        }
        Ok(PageOutcome::Exhausted)
    }
}
