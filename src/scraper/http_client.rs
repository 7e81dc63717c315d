use crate::config::ScraperConfig;
use crate::error::Result;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()?;

        Ok(Self { inner })
    }

    /// Fetch a URL as text. Single attempt: any transport error or non-2xx status is returned.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);

        let resp = self.inner.get(url.clone()).send().await?.error_for_status()?;
        let status = resp.status();
        let text = resp.text().await?;

        debug!("{} → {} ({} bytes)", url, status, text.len());
        Ok(text)
    }
}
