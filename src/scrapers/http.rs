use crate::config::ScoutConfig;
use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// [`Transport`] backed by a `reqwest` client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!("GET {} {:?}", request.url, request.params);

        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        let transport_error = |e: reqwest::Error| ScrapeError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        debug!("Downloaded {} bytes from {} (status {})", body.len(), request.url, status);

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
