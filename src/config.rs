use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// URL templates for every remote page the scraper touches.
///
/// `{city}`, `{state}` and `{id}` are substituted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Search results index for one city.
    pub search: String,
    /// City home page, which lists nearby cities.
    pub city_home: String,
    /// Per-state directory of cities.
    pub state_directory: String,
    /// Thumbnail for one opaque image id.
    pub image: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: "https://{city}.craigslist.org/d/for-sale/search/sss".to_string(),
            city_home: "https://{city}.craigslist.org".to_string(),
            state_directory: "https://geo.craigslist.org/iso/us/{state}".to_string(),
            image: "https://images.craigslist.org/{id}_300x300.jpg".to_string(),
        }
    }
}

impl Endpoints {
    pub fn search_url(&self, city: &str) -> String {
        self.search.replace("{city}", city)
    }

    pub fn city_home_url(&self, city: &str) -> String {
        self.city_home.replace("{city}", city)
    }

    pub fn state_directory_url(&self, state: &str) -> String {
        self.state_directory.replace("{state}", &state.to_lowercase())
    }

    pub fn image_url(&self, image_id: &str) -> String {
        self.image.replace("{id}", image_id)
    }
}

/// Runtime settings for the scraper and its HTTP transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub endpoints: Endpoints,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            endpoints: Endpoints::default(),
        }
    }
}

impl ScoutConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Headers sent with every request. No cookies, no session state.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![("user-agent".to_string(), self.user_agent.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_substitute_placeholders() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.search_url("sfbay"),
            "https://sfbay.craigslist.org/d/for-sale/search/sss"
        );
        assert_eq!(endpoints.city_home_url("boston"), "https://boston.craigslist.org");
        assert_eq!(
            endpoints.state_directory_url("CA"),
            "https://geo.craigslist.org/iso/us/ca"
        );
        assert_eq!(
            endpoints.image_url("00a0a_abc"),
            "https://images.craigslist.org/00a0a_abc_300x300.jpg"
        );
    }

    #[test]
    fn default_headers_carry_a_browser_user_agent() {
        let headers = ScoutConfig::default().headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].0, "user-agent");
        assert!(headers[0].1.starts_with("Mozilla/5.0"));
    }
}
