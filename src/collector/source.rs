use async_trait::async_trait;

use crate::fetcher::{FetchError, PageFetcher};

/// Where result pages come from. The HTTP fetcher in production, canned pages in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Body of the page at `url`, decoded to UTF-8.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url).await.map(|page| page.body_utf8)
    }
}
