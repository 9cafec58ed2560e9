use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::collector::{Collector, PageSource};
use crate::config::ScrapeConfig;
use crate::notify::Notifier;
use crate::reduce::{ReduceStats, Reducer};
use crate::sink;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub raw_records: usize,
    pub failed_pages: usize,
    pub ranked_records: usize,
    pub reduce: ReduceStats,
}

impl RunSummary {
    pub fn message(&self, term: &str) -> String {
        format!(
            "'{}': {} listings scraped ({} pages failed), {} ranked",
            term, self.raw_records, self.failed_pages, self.ranked_records
        )
    }
}

/// Scrape, write the raw dataset, rank, write the ranked dataset, notify.
#[instrument(skip_all, fields(term = %term))]
pub async fn run<S: PageSource>(
    config: &ScrapeConfig,
    term: &str,
    source: S,
    notifier: Option<&dyn Notifier>,
) -> Result<RunSummary> {
    let reducer = Reducer::new(config.rating_quantile, config.coercion_policy)?;

    let collector = Collector::new(source, config.site_root.clone(), config.concurrency);
    let report = collector.collect(term, config.pages()).await;
    let failed_pages = report.failed_pages().count();

    info!("Writing raw dataset to {}", config.raw_output.display());
    sink::write_records(&config.raw_output, &report.records)
        .with_context(|| format!("writing raw dataset to {}", config.raw_output.display()))?;

    let raw_records = report.records.len();
    let outcome = reducer
        .reduce(report.records)
        .context("ranking the raw dataset")?;

    info!("Writing ranked dataset to {}", config.ranked_output.display());
    sink::write_records(&config.ranked_output, &outcome.records).with_context(|| {
        format!(
            "writing ranked dataset to {}",
            config.ranked_output.display()
        )
    })?;

    let summary = RunSummary {
        raw_records,
        failed_pages,
        ranked_records: outcome.records.len(),
        reduce: outcome.stats,
    };

    if let Some(notifier) = notifier
        && let Err(e) = notifier.notify(&summary.message(term)).await
    {
        warn!("{}", e);
    }

    Ok(summary)
}
