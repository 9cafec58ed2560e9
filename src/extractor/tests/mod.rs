use chrono::NaiveDate;
use std::fs;

use crate::extractor::{extract, extract_on};

const SITE_ROOT: &str = "https://www.amazon.com";

fn scrape_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_search_page() {
    let html = fixture("search_page.html");
    let records = extract_on(&html, SITE_ROOT, scrape_date());

    // six result cards, one without a price
    assert_eq!(records.len(), 5);

    let first = &records[0];
    assert_eq!(first.description, "Logitech M185 Wireless Mouse, 2.4GHz");
    assert_eq!(first.price, "14.99");
    assert_eq!(first.rating, "4.5 out of 5 stars");
    assert_eq!(first.review_count, "52,310");
    assert_eq!(first.scrape_date, scrape_date());
    assert_eq!(
        first.url,
        "https://www.amazon.com/Logitech-M185-Wireless-Mouse/dp/B004YAVF8I"
    );
}

#[test]
fn test_extract_keeps_page_order() {
    let html = fixture("search_page.html");
    let descriptions: Vec<String> = extract_on(&html, SITE_ROOT, scrape_date())
        .into_iter()
        .map(|r| r.description)
        .collect();

    assert_eq!(
        descriptions,
        vec![
            "Logitech M185 Wireless Mouse, 2.4GHz",
            "Amazon Basics Wireless Computer Mouse",
            "Vertical Ergonomic Mouse",
            "Silent Click Mouse",
            "RGB Gaming Mouse",
        ]
    );
}

#[test]
fn test_extract_link_wrapping_heading() {
    let html = fixture("search_page.html");
    let records = extract_on(&html, SITE_ROOT, scrape_date());

    let ergonomic = records
        .iter()
        .find(|r| r.description == "Vertical Ergonomic Mouse")
        .expect("layout with the link around the heading should be extracted");
    assert_eq!(ergonomic.url, "https://www.amazon.com/Vertical-Ergonomic-Mouse/dp/B0004");
    assert_eq!(ergonomic.price, "29.99");
}

#[test]
fn test_extract_absolute_href_and_thousands_price() {
    let html = fixture("search_page.html");
    let records = extract_on(&html, SITE_ROOT, scrape_date());

    let gaming = records.last().unwrap();
    assert_eq!(gaming.url, "https://www.amazon.com/Gaming-Mouse/dp/B0006");
    assert_eq!(gaming.price, "1,049.00");
    assert_eq!(gaming.review_count, "3,412");
}

#[test]
fn test_extract_drops_each_missing_field() {
    let card = |heading: &str, price: &str, rating: &str, reviews: &str| {
        format!(
            r#"<div data-component-type="s-search-result">{heading}{price}{rating}{reviews}</div>"#
        )
    };
    let heading = r#"<h2><a href="/p/1"><span>Desk Lamp</span></a></h2>"#;
    let price = r#"<span class="a-offscreen">$19.99</span>"#;
    let rating = r#"<i class="a-icon-star-small"><span>4.2 out of 5 stars</span></i>"#;
    let reviews = r#"<span class="a-size-base s-underline-text">(310)</span>"#;

    let html = [
        card(heading, price, rating, reviews),
        card("", price, rating, reviews),
        card(heading, "", rating, reviews),
        card(heading, price, "", reviews),
        card(heading, price, rating, ""),
        card(r#"<h2><a href="/p/2"><span>   </span></a></h2>"#, price, rating, reviews),
    ]
    .concat();

    let records = extract_on(&format!("<html><body>{html}</body></html>"), SITE_ROOT, scrape_date());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "Desk Lamp");
    assert_eq!(records[0].rating, "4.2 out of 5 stars");
}

#[test]
fn test_extract_rating_falls_back_to_first_icon() {
    let html = r#"<div data-component-type="s-search-result">
        <h2><a href="/p/9"><span>Plain Icon Listing</span></a></h2>
        <i class="rating"> 3.8 out of 5 stars </i>
        <span class="a-offscreen">$5.00</span>
        <span class="a-size-base s-underline-text">(2)</span>
    </div>"#;

    let records = extract_on(html, SITE_ROOT, scrape_date());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rating, "3.8 out of 5 stars");
}

#[test]
fn test_extract_page_without_results() {
    let html = fixture("no_results.html");
    assert!(extract(&html, SITE_ROOT).is_empty());
}

#[test]
fn test_extract_uses_single_date_per_call() {
    let html = fixture("search_page.html");
    let records = extract(&html, SITE_ROOT);

    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.scrape_date == records[0].scrape_date));
}

#[test]
fn test_malformed_html() {
    let html = r#"<div data-component-type="s-search-result"><h2><a href="/x">Unclosed
        <i>4.1 out of 5 stars<span class="a-offscreen">$3.50<span class="a-size-base s-underline-text">(7)"#;

    // Should handle malformed HTML gracefully
    let records = extract_on(html, SITE_ROOT, scrape_date());
    assert!(records.len() <= 1);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract_on(&html, SITE_ROOT, scrape_date());
        }

        #[test]
        fn test_extracted_fields_are_trimmed(description in "[A-Za-z0-9 ]{1,40}") {
            let html = format!(
                r#"<div data-component-type="s-search-result"><h2><a href="/p">{description}</a></h2><i>4.0</i><span class="a-offscreen">$1</span><span class="a-size-base s-underline-text">(1)</span></div>"#
            );
            for record in extract_on(&html, SITE_ROOT, scrape_date()) {
                prop_assert_eq!(record.description.trim(), record.description.as_str());
                prop_assert!(!record.description.is_empty());
            }
        }
    }
}
