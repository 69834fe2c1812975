use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};

use crate::error::scrape::{ErrorKind, ScrapeError};

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Where pages and documents come from.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

        // The campus site does not serve a chain the default roots accept.
        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| ScrapeError::wrap(ErrorKind::Transport, err))?;

        Ok(HttpFetcher { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let text = self.get(url).await?.text().await?;
        Ok(text)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
