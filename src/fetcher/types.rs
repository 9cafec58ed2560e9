use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

/// A successfully fetched result page, decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
    /// WHATWG name of the encoding the body was decoded from.
    pub encoding: &'static str,
    pub fetched_at: DateTime<Utc>,
}
