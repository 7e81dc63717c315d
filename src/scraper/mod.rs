pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::models::SpacRecord;
use async_trait::async_trait;
use tracing::info;
use url::Url;

use self::cleaner::clean_rows;
use self::http_client::HttpClient;
use self::parsers::{extract, Layout, RowFilter};

// ── Source trait ──────────────────────────────────────────────────────────────

/// Anything that can hand back the listing page HTML.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Fetch the page from `source`, walk it under `layout` and clean every kept row.
pub async fn fetch_records(
    source: &dyn ListingSource,
    layout: Layout,
    filter: &RowFilter,
) -> Result<Vec<SpacRecord>> {
    info!("Fetching listing from {}", source.describe());
    let html = source.fetch_page().await?;

    let map = layout.field_map();
    let raw = extract(&html, &map, filter)?;
    let records = clean_rows(raw, &map);

    info!("{} SPACs matched ({:?} layout)", records.len(), layout);
    Ok(records)
}

// ── spachero.com ──────────────────────────────────────────────────────────────

pub struct SpacheroScraper {
    client: HttpClient,
    url: Url,
}

impl SpacheroScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url)?;
        Ok(Self {
            client: HttpClient::new(config)?,
            url,
        })
    }
}

#[async_trait]
impl ListingSource for SpacheroScraper {
    async fn fetch_page(&self) -> Result<String> {
        self.client.get_text(&self.url).await
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

// ── Test fixtures ─────────────────────────────────────────────────────────────
