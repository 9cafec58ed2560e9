use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use listing_scout::{
    CoercionPolicy, ConfigOverrides, HeaderSet, PageFetcher, ScrapeConfig, notify::LogNotifier,
    telemetry, workflow,
};
use tracing::info;

/// Scrape product search results and rank the listings.
#[derive(Parser, Debug)]
#[command(name = "listing-scout", version, about)]
struct Cli {
    /// The item to search for
    term: String,

    /// Number of result pages to visit, starting at page 1
    #[arg(long)]
    pages: Option<u32>,

    /// Keep listings rated at or above this quantile of all ratings
    #[arg(long)]
    quantile: Option<f64>,

    /// Maximum simultaneous page fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// JSON object of request headers
    #[arg(long)]
    headers: Option<PathBuf>,

    /// Where to write every scraped listing
    #[arg(long)]
    raw_output: Option<PathBuf>,

    /// Where to write the ranked listings
    #[arg(long)]
    ranked_output: Option<PathBuf>,

    /// Fail on unparseable ratings or prices instead of skipping the listing
    #[arg(long)]
    strict: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Split into the search term and the flags that override the environment.
    fn into_parts(self) -> (String, ConfigOverrides) {
        let overrides = ConfigOverrides {
            page_count: self.pages,
            rating_quantile: self.quantile,
            concurrency: self.concurrency,
            headers_path: self.headers,
            raw_output: self.raw_output,
            ranked_output: self.ranked_output,
            coercion_policy: self.strict.then_some(CoercionPolicy::Abort),
        };
        (self.term, overrides)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json);

    let (term, overrides) = cli.into_parts();
    let config = ScrapeConfig::from_env_with(&overrides)?;

    let headers = HeaderSet::load(config.headers_path())?;
    let fetcher = PageFetcher::new(&headers, Duration::from_secs(config.request_timeout_secs))
        .context("building HTTP client")?;

    let summary = workflow::run(&config, &term, fetcher, Some(&LogNotifier)).await?;
    info!(
        raw = summary.raw_records,
        ranked = summary.ranked_records,
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "listing-scout",
            "desk lamp",
            "--pages",
            "3",
            "--quantile",
            "0.5",
            "--concurrency",
            "4",
            "--headers",
            "h.json",
            "--raw-output",
            "raw.csv",
            "--ranked-output",
            "ranked.csv",
            "--strict",
        ])
        .unwrap();
        let (term, overrides) = cli.into_parts();

        assert_eq!(term, "desk lamp");
        assert_eq!(overrides.page_count, Some(3));
        assert_eq!(overrides.rating_quantile, Some(0.5));
        assert_eq!(overrides.concurrency, Some(4));
        assert_eq!(overrides.headers_path, Some(PathBuf::from("h.json")));
        assert_eq!(overrides.raw_output, Some(PathBuf::from("raw.csv")));
        assert_eq!(overrides.ranked_output, Some(PathBuf::from("ranked.csv")));
        assert_eq!(overrides.coercion_policy, Some(CoercionPolicy::Abort));
    }

    #[test]
    fn bare_term_overrides_nothing() {
        let cli = Cli::try_parse_from(["listing-scout", "ssd"]).unwrap();
        assert!(!cli.log_json);
        let (term, overrides) = cli.into_parts();

        assert_eq!(term, "ssd");
        assert_eq!(overrides, ConfigOverrides::default());
    }

    #[test]
    fn term_is_required() {
        assert!(Cli::try_parse_from(["listing-scout"]).is_err());
        assert!(Cli::try_parse_from(["listing-scout", "ssd", "--pages", "many"]).is_err());
    }
}
