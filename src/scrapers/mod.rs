pub mod craigslist;
pub mod directory;
pub mod geo;
pub mod http;
pub mod listing;
pub mod markup;
pub mod page;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use craigslist::CraigslistScraper;
pub use directory::Directory;
pub use http::ReqwestTransport;
pub use page::PAGE_SIZE;
pub use traits::{HttpRequest, HttpResponse, Transport};
pub use types::{Lookback, SearchQuery, SortOrder};
