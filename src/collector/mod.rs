//! Pagination: walk result pages `1..=N`, fetch and extract each, and fold the
//! per-page records into one raw dataset in page order.

pub mod source;

pub use source::PageSource;

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{Instrument, error, info, info_span, warn};

use crate::extractor::{self, Record};
use crate::fetcher::FetchError;
use crate::search::build_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Number of complete listings found on the page.
    Extracted(usize),
    /// Fetch failed; the page contributed no records.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: u32,
    pub url: String,
    pub status: PageStatus,
}

/// Raw dataset plus what happened on each page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub records: Vec<Record>,
    pub pages: Vec<PageOutcome>,
}

impl CollectReport {
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages
            .iter()
            .filter(|p| matches!(p.status, PageStatus::Failed(_)))
    }
}

pub struct Collector<S> {
    source: Arc<S>,
    site_root: String,
    concurrency: usize,
}

impl<S: PageSource> Collector<S> {
    pub fn new(source: S, site_root: impl Into<String>, concurrency: usize) -> Self {
        Self {
            source: Arc::new(source),
            site_root: site_root.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Collect every page in `pages`, stamping records with today's date.
    pub async fn collect(&self, term: &str, pages: RangeInclusive<u32>) -> CollectReport {
        self.collect_on(term, pages, Local::now().date_naive()).await
    }

    /// Collect every page in `pages`.
    ///
    /// A page that fails to fetch is logged and contributes nothing; the run
    /// always visits the whole range. Records come out in page order, then
    /// on-page order, whatever order the fetches finish in.
    pub async fn collect_on(
        &self,
        term: &str,
        pages: RangeInclusive<u32>,
        scrape_date: NaiveDate,
    ) -> CollectReport {
        info!(
            term,
            first = *pages.start(),
            last = *pages.end(),
            concurrency = self.concurrency,
            "collecting result pages"
        );

        let per_page = if self.concurrency == 1 {
            self.collect_sequential(term, pages, scrape_date).await
        } else {
            self.collect_concurrent(term, pages, scrape_date).await
        };

        let report = per_page.into_iter().fold(
            CollectReport::default(),
            |mut report, (page, (url, result))| {
                let status = match result {
                    Ok(records) => {
                        let n = records.len();
                        report.records.extend(records);
                        PageStatus::Extracted(n)
                    }
                    Err(e) => PageStatus::Failed(e.to_string()),
                };
                report.pages.push(PageOutcome { page, url, status });
                report
            },
        );

        info!(
            records = report.records.len(),
            failed_pages = report.failed_pages().count(),
            "collected raw dataset"
        );
        report
    }

    async fn collect_sequential(
        &self,
        term: &str,
        pages: RangeInclusive<u32>,
        scrape_date: NaiveDate,
    ) -> BTreeMap<u32, PageResult> {
        let mut per_page = BTreeMap::new();
        for page in pages {
            let result =
                fetch_and_extract(self.source.as_ref(), &self.site_root, term, page, scrape_date)
                    .instrument(info_span!("page", page))
                    .await;
            per_page.insert(page, result);
        }
        per_page
    }

    async fn collect_concurrent(
        &self,
        term: &str,
        pages: RangeInclusive<u32>,
        scrape_date: NaiveDate,
    ) -> BTreeMap<u32, PageResult> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut task_pages = HashMap::new();

        for page in pages {
            let source = self.source.clone();
            let semaphore = semaphore.clone();
            let site_root = self.site_root.clone();
            let task_term = term.to_string();
            let handle = tasks.spawn(
                async move {
                    // the semaphore is never closed
                    let _permit = semaphore.acquire_owned().await.ok();
                    let result = fetch_and_extract(
                        source.as_ref(),
                        &site_root,
                        &task_term,
                        page,
                        scrape_date,
                    )
                    .await;
                    (page, result)
                }
                .instrument(info_span!("page", page)),
            );
            task_pages.insert(handle.id(), page);
        }

        let mut per_page = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, result)) => {
                    per_page.insert(page, result);
                }
                Err(e) => {
                    let Some(&page) = task_pages.get(&e.id()) else {
                        error!("unknown page task failed: {}", e);
                        continue;
                    };
                    error!("page {} task failed to complete: {}", page, e);
                    let url = build_url(&self.site_root, term, page);
                    per_page.insert(
                        page,
                        (url, Err(FetchError::Unknown(format!("page task failed: {e}")))),
                    );
                }
            }
        }
        per_page
    }
}

type PageResult = (String, Result<Vec<Record>, FetchError>);

async fn fetch_and_extract<S: PageSource + ?Sized>(
    source: &S,
    site_root: &str,
    term: &str,
    page: u32,
    scrape_date: NaiveDate,
) -> PageResult {
    let url = build_url(site_root, term, page);
    info!("Requesting data from page {}", page);

    let result = match source.fetch_page(&url).await {
        Ok(html) => Ok(extractor::extract_on(&html, site_root, scrape_date)),
        Err(e) => {
            warn!(retriable = e.should_retry(), "skipping page {}: {}", page, e);
            Err(e)
        }
    };
    (url, result)
}
