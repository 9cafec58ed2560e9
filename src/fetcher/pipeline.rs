use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

use crate::fetcher::types::PageResponse;

/// How far into the body we look for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: Bytes,
    content_type: Option<&str>,
) -> PageResponse {
    let encoding = detect_encoding(content_type, &body_bytes);
    let body_utf8 = decode(&body_bytes, encoding);

    PageResponse {
        url_final,
        status,
        body_utf8,
        encoding: encoding.name(),
        fetched_at: Utc::now(),
    }
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Content-Type header first, then a `<meta>` declaration, then a guess.
fn detect_encoding(content_type: Option<&str>, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = content_type.and_then(|ct| label_from(&CHARSET_REGEX, ct)) {
        return encoding;
    }

    let head = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let head_str = String::from_utf8_lossy(head);
    // http-equiv content attributes carry "charset=..." too, so the plain
    // header regex catches them once the meta form has missed.
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head_str)
        .or_else(|| label_from(&CHARSET_REGEX, &head_str))
    {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body_bytes.len() <= SNIFF_LEN);
    detector.guess(None, true)
}

/// Malformed sequences become U+FFFD; the rest of the page stays usable.
fn decode(body_bytes: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, _, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body has malformed sequences, replaced with U+FFFD"
        );
    }

    decoded.into_owned()
}
