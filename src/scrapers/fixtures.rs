//! HTML builders shaped like the live site's pages, for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::{HttpRequest, HttpResponse, Transport};

pub(crate) struct ListingRow<'a> {
    pub id: &'a str,
    pub posted_at: &'a str,
    pub title_link: bool,
    pub price: Option<&'a str>,
    pub hood: Option<&'a str>,
    pub image_ids: Option<&'a str>,
}

impl<'a> ListingRow<'a> {
    pub fn new(id: &'a str, posted_at: &'a str) -> Self {
        Self {
            id,
            posted_at,
            title_link: true,
            price: None,
            hood: None,
            image_ids: None,
        }
    }
}

pub(crate) fn listing_row(row: &ListingRow<'_>) -> String {
    let gallery = row
        .image_ids
        .map(|ids| {
            format!(r#"<a href="/sfc/{}.html" class="result-image gallery" data-ids="{ids}"></a>"#, row.id)
        })
        .unwrap_or_else(|| format!(r#"<a href="/sfc/{}.html" class="result-image gallery empty"></a>"#, row.id));
    let title = if row.title_link {
        format!(
            r#"<a href="https://sfbay.craigslist.org/sfc/{id}.html" data-id="{id}" class="result-title hdrlnk">Listing {id}</a>"#,
            id = row.id
        )
    } else {
        String::new()
    };
    let price = row
        .price
        .map(|p| format!(r#"<span class="result-price">{p}</span>"#))
        .unwrap_or_default();
    let hood = row
        .hood
        .map(|h| format!(r#"<span class="result-hood">{h}</span>"#))
        .unwrap_or_default();

    format!(
        r#"<li class="result-row" data-pid="{id}">
  {gallery}
  <div class="result-info">
    <time class="result-date" datetime="{posted_at}" title="listing time">Oct 15</time>
    <h3 class="result-heading">{title}</h3>
    <span class="result-meta">{price}{hood}</span>
  </div>
</li>"#,
        id = row.id,
        posted_at = row.posted_at,
    )
}

/// Search results page; `total` of `None` leaves out the count marker.
pub(crate) fn search_page(total: Option<u64>, rows: &[String]) -> String {
    let count = total
        .map(|n| format!(r#"<span class="button pagenum"><span class="rangeTo">120</span> of <span class="totalcount">{n}</span></span>"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html><html><head><title>for sale</title></head><body>
<div class="search-legend">{count}</div>
<ul class="rows">{}</ul>
</body></html>"#,
        rows.join("\n")
    )
}

/// One page of `count` rows, posted at `posted_at`, ids starting at `first_id`.
pub(crate) fn rows(first_id: u64, count: u64, posted_at: &str) -> Vec<String> {
    (first_id..first_id + count)
        .map(|id| listing_row(&ListingRow::new(&id.to_string(), posted_at)))
        .collect()
}

pub(crate) fn detail_page(latitude: &str, longitude: &str) -> String {
    format!(
        r#"<html><body><section class="body">
<div class="mapAndAttrs"><div id="map" class="viewposting" data-latitude="{latitude}" data-longitude="{longitude}" data-accuracy="10"></div></div>
</section></body></html>"#
    )
}

pub(crate) fn nearby_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|href| format!(r#"<li class="s"><a href="{href}">city</a></li>"#))
        .collect();
    format!(
        r#"<html><body><div id="leftbar"><ul class="acitem"><li class="h"><a href="/about">nearby cl</a></li>{items}</ul></div></body></html>"#
    )
}

pub(crate) fn state_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">city</a></li>"#))
        .collect();
    format!(
        r#"<html><body><div class="geo-site-list-container"><ul class="geo-site-list">{items}</ul></div></body></html>"#
    )
}

/// Transport stub that answers from a queue and records every request.
pub(crate) struct StubTransport {
    responses: Mutex<Vec<(u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Responses are served in the given order.
    pub fn new(responses: Vec<(u16, String)>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// `s` offsets of the search requests seen so far
    pub fn offsets(&self) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .map(|r| r.param("s").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ScrapeError::Transport {
                url: request.url.clone(),
                message: "no stubbed response left".to_string(),
            })?;
        Ok(HttpResponse {
            status,
            body: body.into_bytes(),
        })
    }
}
