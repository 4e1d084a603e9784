use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::scrapers::markup::{first, DirectoryMarkup, Markup, ATTR_HREF};

/// Which city directory to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directory {
    /// Cities listed as nearby on a city's home page
    Nearby { city: String },
    /// Cities with a site in a US state, by two-letter postal code
    State { state: String },
}

impl Directory {
    pub(crate) fn markup<'a>(&self, markup: &'a Markup) -> &'a DirectoryMarkup {
        match self {
            Directory::Nearby { .. } => &markup.nearby_cities,
            Directory::State { .. } => &markup.state_cities,
        }
    }
}

/// City slugs linked from the directory container, in page order.
pub fn parse_directory(markup: &DirectoryMarkup, body: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(body);
    let container = document
        .select(&markup.container)
        .next()
        .ok_or_else(|| ScrapeError::parse("city directory", "no city list on page"))?;

    container
        .select(&markup.entry)
        .map(|entry| {
            let link = match &markup.link {
                Some(selector) => first(entry, selector)
                    .ok_or_else(|| ScrapeError::parse("city directory", "city entry has no link"))?,
                None => entry,
            };
            let href = link
                .value()
                .attr(ATTR_HREF)
                .ok_or_else(|| ScrapeError::parse("city directory", "city link has no href"))?;
            slug_from_link(href).ok_or_else(|| {
                ScrapeError::parse("city directory", format!("no city in link '{href}'"))
            })
        })
        .collect()
}

/// `https://berkeley.craigslist.org/` and `//berkeley.craigslist.org` both give `berkeley`.
pub fn slug_from_link(href: &str) -> Option<String> {
    let rest = href.trim();
    let rest = rest
        .split_once("://")
        .map(|(_, after)| after)
        .unwrap_or(rest);
    let rest = rest.trim_start_matches('/');
    let host = rest.split('/').next().unwrap_or_default();
    let slug = host.split('.').next().unwrap_or_default();
    (!slug.is_empty()).then(|| slug.to_string())
}
