//! Scrape paginated product search results and rank the listings.
//!
//! [`collector::Collector`] drives [`search::build_url`], a
//! [`collector::PageSource`] and [`extractor::extract_on`] across the page
//! range to build the raw dataset; [`reduce::Reducer`] turns it into the
//! ranked dataset; [`sink`] writes both as CSV. [`workflow::run`] wires the
//! whole thing together.

pub mod collector;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod notify;
pub mod reduce;
pub mod search;
pub mod sink;
pub mod telemetry;
pub mod workflow;

pub use collector::{CollectReport, Collector, PageSource};
pub use config::{ConfigOverrides, HeaderSet, ScrapeConfig};
pub use extractor::Record;
pub use fetcher::{FetchError, PageFetcher};
pub use reduce::{CoercionPolicy, ReduceOutcome, Reducer};
pub use workflow::{RunSummary, run};
