use crate::config::HeaderSet;
use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Sent with every request alongside the configured headers.
pub const OPT_OUT_COOKIE: &str = "__hs_opt_out=no";

/// Issues one GET per result page with a fixed header set.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(headers: &HeaderSet, timeout: Duration) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(build_header_map(headers)?)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http {
                status,
                retriable: status.is_server_error() || status.as_u16() == 429,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_string);

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        // Content-Length may be absent on chunked responses
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        debug!(status = %status, bytes = body_bytes.len(), "page fetched");
        Ok(process_response(
            final_url,
            status,
            body_bytes,
            content_type.as_deref(),
        ))
    }
}

fn build_header_map(headers: &HeaderSet) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.iter() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }

    let cookie = match map.get(COOKIE).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}; {OPT_OUT_COOKIE}"),
        _ => OPT_OUT_COOKIE.to_string(),
    };
    let cookie = HeaderValue::from_str(&cookie).map_err(|e| FetchError::InvalidHeader {
        name: COOKIE.to_string(),
        reason: e.to_string(),
    })?;
    map.insert(COOKIE, cookie);

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_always_carries_opt_out_cookie() {
        let map = build_header_map(&HeaderSet::new()).unwrap();
        assert_eq!(map.get(COOKIE).unwrap(), OPT_OUT_COOKIE);
    }

    #[test]
    fn header_map_appends_to_configured_cookie() {
        let headers: HeaderSet = [("User-Agent", "Mozilla/5.0"), ("Cookie", "session=abc")]
            .into_iter()
            .collect();
        let map = build_header_map(&headers).unwrap();
        assert_eq!(map.get("user-agent").unwrap(), "Mozilla/5.0");
        assert_eq!(map.get(COOKIE).unwrap(), "session=abc; __hs_opt_out=no");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers: HeaderSet = [("Bad Header", "x")].into_iter().collect();
        let err = build_header_map(&headers).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { .. }));
    }
}
