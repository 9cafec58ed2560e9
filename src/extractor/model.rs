use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One product listing pulled from a search-result page.
///
/// Price, rating and review count stay in their extraction-time text form;
/// the reduction pipeline parses them into transient sort/filter keys.
/// Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Description")]
    pub description: String,
    /// Currency symbol already stripped, e.g. `"1,299.99"`.
    #[serde(rename = "Price")]
    pub price: String,
    /// Free text such as `"4.5 out of 5 stars"`.
    #[serde(rename = "Rating")]
    pub rating: String,
    /// Parentheses already stripped, e.g. `"12,408"`.
    #[serde(rename = "Number of Reviews")]
    pub review_count: String,
    #[serde(rename = "Scraping Date")]
    pub scrape_date: NaiveDate,
    #[serde(rename = "URL")]
    pub url: String,
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
