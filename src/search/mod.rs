/// Search endpoint URL for `term` on result page `page`.
///
/// Spaces in the term become `+`; every other character passes through as-is.
pub fn build_url(site_root: &str, term: &str, page: u32) -> String {
    let root = site_root.trim_end_matches('/');
    let term = term.replace(' ', "+");
    format!("{root}/s?k={term}&page={page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_as_plus() {
        let url = build_url("https://www.amazon.com", "wireless mouse", 2);
        assert_eq!(url, "https://www.amazon.com/s?k=wireless+mouse&page=2");
        assert!(url.contains("k=wireless+mouse"));
        assert!(url.contains("page=2"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn tolerates_trailing_slash_on_root() {
        let url = build_url("http://127.0.0.1:8080/", "ssd", 1);
        assert_eq!(url, "http://127.0.0.1:8080/s?k=ssd&page=1");
    }

    #[test]
    fn other_characters_pass_through() {
        let url = build_url("https://www.amazon.com", "usb-c 3.1 hub", 9);
        assert_eq!(url, "https://www.amazon.com/s?k=usb-c+3.1+hub&page=9");
    }
}
