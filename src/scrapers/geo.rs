use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::models::GeoPoint;
use crate::scrapers::markup::{Markup, ATTR_LATITUDE, ATTR_LONGITUDE};

/// Reads the coordinates off a listing's detail page.
pub fn parse_geolocation(markup: &Markup, body: &str) -> Result<GeoPoint> {
    let document = Html::parse_document(body);
    let view = document
        .select(&markup.detail_view)
        .next()
        .ok_or_else(|| ScrapeError::parse("detail page", "no map view on page"))?;

    let coordinate = |name: &'static str| -> Result<f64> {
        let raw = view
            .value()
            .attr(name)
            .ok_or_else(|| ScrapeError::parse("detail page", format!("map view has no {name}")))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ScrapeError::parse("detail page", format!("{name} '{raw}' is not a number")))
    };

    Ok(GeoPoint {
        latitude: coordinate(ATTR_LATITUDE)?,
        longitude: coordinate(ATTR_LONGITUDE)?,
    })
}
