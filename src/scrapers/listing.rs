use crate::error::{Result, ScrapeError};
use crate::models::Record;
use crate::scrapers::markup::{
    first, text_of, Markup, ATTR_DATETIME, ATTR_HREF, ATTR_IMAGE_IDS, ATTR_POST_ID,
    DATETIME_FORMAT,
};
use chrono::NaiveDateTime;
use scraper::ElementRef;
use tokio::sync::OnceCell;

/// Builds a [`Record`] from one listing row of a search results page.
///
/// The post id, timestamp and title link are required. Price, neighborhood
/// and images fall back to `0`, `city` and an empty list when the row does
/// not carry them.
pub fn extract_record(markup: &Markup, city: &str, row: ElementRef<'_>) -> Result<Record> {
    let id = row
        .value()
        .attr(ATTR_POST_ID)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScrapeError::malformed(None, "missing post id"))?
        .to_string();
    let malformed = |detail: String| ScrapeError::malformed(Some(id.as_str()), detail);

    let posted_at = first(row, &markup.posted_at)
        .and_then(|time| time.value().attr(ATTR_DATETIME))
        .ok_or_else(|| malformed("missing post timestamp".to_string()))?;
    let posted_at = NaiveDateTime::parse_from_str(posted_at.trim(), DATETIME_FORMAT)
        .map_err(|e| malformed(format!("unreadable timestamp '{posted_at}': {e}")))?;

    let link = first(row, &markup.title_link)
        .ok_or_else(|| malformed("missing title link".to_string()))?;
    let detail_url = link
        .value()
        .attr(ATTR_HREF)
        .ok_or_else(|| malformed("title link has no href".to_string()))?
        .to_string();
    let title = text_of(link).trim().to_string();

    // Price and neighborhood both live inside the meta span.
    let meta = first(row, &markup.meta);

    let (price, price_listed) = match meta.and_then(|m| first(m, &markup.price)) {
        Some(element) => {
            let raw = text_of(element);
            (parse_price(&raw).map_err(malformed)?, true)
        }
        None => (0, false),
    };

    let neighborhood = meta
        .and_then(|m| first(m, &markup.neighborhood))
        .map(|element| clean_neighborhood(&text_of(element)))
        .filter(|hood| !hood.is_empty())
        .unwrap_or_else(|| city.to_string());

    // Rows without pictures carry an empty gallery with no id list.
    let image_refs = match first(row, &markup.gallery).and_then(|g| g.value().attr(ATTR_IMAGE_IDS)) {
        Some(ids) => parse_image_ids(ids).map_err(malformed)?,
        None => Vec::new(),
    };

    Ok(Record {
        id,
        posted_at,
        detail_url,
        title,
        price,
        price_listed,
        city: city.to_string(),
        neighborhood,
        image_refs,
        geolocation: OnceCell::new(),
    })
}

/// Parses a displayed price such as `$1,250` into whole dollars.
pub fn parse_price(raw: &str) -> std::result::Result<u64, String> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    digits
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("non-numeric price '{}'", raw.trim()))
}

/// Strips whitespace and the enclosing parentheses, e.g. ` (mission district)`.
pub fn clean_neighborhood(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('(').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(')').unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// Splits a gallery id list (`"1:abc,1:def"`) into image ids, keeping the
/// first occurrence of any repeated id.
pub fn parse_image_ids(raw: &str) -> std::result::Result<Vec<String>, String> {
    let mut ids: Vec<String> = Vec::new();
    if raw.trim().is_empty() {
        return Ok(ids);
    }

    for entry in raw.split(',') {
        let (_, id) = entry
            .split_once(':')
            .ok_or_else(|| format!("image entry '{entry}' has no ':'"))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("image entry '{entry}' has an empty id"));
        }
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }

    Ok(ids)
}
