//! Every tag, class and attribute name the scraper relies on.
//!
//! The site's markup is assumed stable. When it changes, this table is the
//! only place that needs touching.

use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};

pub const ATTR_POST_ID: &str = "data-pid";
pub const ATTR_DATETIME: &str = "datetime";
pub const ATTR_HREF: &str = "href";
pub const ATTR_IMAGE_IDS: &str = "data-ids";
pub const ATTR_LATITUDE: &str = "data-latitude";
pub const ATTR_LONGITUDE: &str = "data-longitude";

/// Format of the listing timestamp attribute
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Container of city entries and where each entry keeps its link
pub struct DirectoryMarkup {
    pub container: Selector,
    pub entry: Selector,
    /// Link inside an entry; only the first match counts. `None` when the
    /// entry is the link itself.
    pub link: Option<Selector>,
}

/// Compiled selectors for search, detail and directory pages
pub struct Markup {
    pub total_count: Selector,
    pub listing_row: Selector,
    pub posted_at: Selector,
    pub title_link: Selector,
    pub meta: Selector,
    pub price: Selector,
    pub neighborhood: Selector,
    pub gallery: Selector,
    pub detail_view: Selector,
    pub nearby_cities: DirectoryMarkup,
    pub state_cities: DirectoryMarkup,
}

impl Markup {
    pub fn new() -> Result<Self> {
        Ok(Self {
            total_count: compile("span.totalcount")?,
            listing_row: compile("li.result-row")?,
            posted_at: compile("time.result-date")?,
            title_link: compile("a.result-title.hdrlnk")?,
            meta: compile("span.result-meta")?,
            price: compile("span.result-price")?,
            neighborhood: compile("span.result-hood")?,
            gallery: compile("a.result-image.gallery[data-ids]")?,
            detail_view: compile("div.viewposting")?,
            nearby_cities: DirectoryMarkup {
                container: compile("ul.acitem")?,
                entry: compile("li.s")?,
                link: Some(compile("a")?),
            },
            state_cities: DirectoryMarkup {
                container: compile("ul.geo-site-list")?,
                entry: compile("a")?,
                link: None,
            },
        })
    }
}

fn compile(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::parse("selector", format!("{css}: {e:?}")))
}

/// First element under `scope` matching `selector`
pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Concatenated text content of an element
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_selector_compiles() {
        assert!(Markup::new().is_ok());
    }
}
