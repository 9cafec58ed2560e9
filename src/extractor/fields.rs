use scraper::ElementRef;

use crate::extractor::model::normalize_whitespace;

/// Whitespace-normalized text of an element, `None` when blank.
pub fn node_text(element: ElementRef<'_>) -> Option<String> {
    let text = normalize_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Drop the leading currency symbol: `"$1,299.99"` becomes `"1,299.99"`.
pub fn clean_price(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.')
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Drop the parentheses around a review count: `"(12,408)"` becomes `"12,408"`.
pub fn clean_review_count(text: &str) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| *c != '(' && *c != ')').collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
