use once_cell::sync::Lazy;
use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// One search-result card.
pub static RESULT_NODE: Lazy<Selector> =
    Lazy::new(|| selector(r#"div[data-component-type="s-search-result"]"#));

pub static HEADING: Lazy<Selector> = Lazy::new(|| selector("h2"));

pub static HEADING_LINK: Lazy<Selector> = Lazy::new(|| selector("h2 a[href]"));

pub static OFFSCREEN_PRICE: Lazy<Selector> = Lazy::new(|| selector("span.a-offscreen"));

pub static STAR_RATING: Lazy<Selector> = Lazy::new(|| selector(r#"i[class*="a-icon-star"]"#));

pub static ANY_ICON: Lazy<Selector> = Lazy::new(|| selector("i"));

pub static REVIEW_COUNT: Lazy<Selector> =
    Lazy::new(|| selector("span.a-size-base.s-underline-text"));
