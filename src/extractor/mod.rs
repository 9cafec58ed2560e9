pub mod fields;
pub mod model;
pub mod selectors;

#[cfg(test)]
mod tests;

pub use model::Record;

use chrono::{Local, NaiveDate};
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::extractor::fields::{clean_price, clean_review_count, node_text};
use crate::extractor::selectors::{
    ANY_ICON, HEADING, HEADING_LINK, OFFSCREEN_PRICE, RESULT_NODE, REVIEW_COUNT, STAR_RATING,
};

/// Extract every complete listing from one result page, stamped with today's date.
pub fn extract(html: &str, site_root: &str) -> Vec<Record> {
    extract_on(html, site_root, Local::now().date_naive())
}

/// Extract every complete listing from one result page.
///
/// Result cards missing any required field are skipped. Output keeps
/// on-page order and is not deduplicated.
pub fn extract_on(html: &str, site_root: &str, scrape_date: NaiveDate) -> Vec<Record> {
    let document = Html::parse_document(html);

    let mut candidates = 0usize;
    let records: Vec<Record> = document
        .select(&RESULT_NODE)
        .inspect(|_| candidates += 1)
        .filter_map(|node| extract_record(node, site_root, scrape_date))
        .collect();

    debug!(
        candidates,
        kept = records.len(),
        "extracted listings from result page"
    );
    records
}

/// Build a record from one result card, or `None` on the first missing field.
pub fn extract_record(node: ElementRef<'_>, site_root: &str, scrape_date: NaiveDate) -> Option<Record> {
    let link = heading_link(node)?;

    let description = node_text(link)?;
    let href = link.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let price = node
        .select(&OFFSCREEN_PRICE)
        .next()
        .and_then(node_text)
        .and_then(|text| clean_price(&text))?;

    let rating = node
        .select(&STAR_RATING)
        .next()
        .or_else(|| node.select(&ANY_ICON).next())
        .and_then(node_text)?;

    let review_count = node
        .select(&REVIEW_COUNT)
        .next()
        .and_then(node_text)
        .and_then(|text| clean_review_count(&text))?;

    Some(Record {
        description,
        price,
        rating,
        review_count,
        scrape_date,
        url: absolute_url(site_root, href),
    })
}

/// The link inside the card heading, or the link wrapping it in newer layouts.
fn heading_link(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if let Some(link) = node.select(&HEADING_LINK).next() {
        return Some(link);
    }

    let heading = node.select(&HEADING).next()?;
    heading
        .ancestors()
        .take_while(|ancestor| ancestor.id() != node.id())
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a" && el.value().attr("href").is_some())
}

fn absolute_url(site_root: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let root = site_root.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{root}{href}")
    } else {
        format!("{root}/{href}")
    }
}
