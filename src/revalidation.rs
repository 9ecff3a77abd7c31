//! Assembly of conditional-request headers for revalidating a stale entry.
//!
//! Validators are read from the *cached response*, never the incoming
//! request — arming revalidation from the request's own headers would let
//! a caller-supplied `If-None-Match` silently suppress revalidation.

use http::header::{HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH};

use crate::entry::CacheEntry;

/// Builds the conditional headers to send when revalidating `entry`.
/// Returns an empty vector if the cached response carries no validators —
/// the caller should then simply refetch unconditionally.
pub fn conditional_headers(entry: &CacheEntry) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = Vec::new();

    if let Some(etag) = entry.header("etag") {
        if let Ok(value) = HeaderValue::from_str(etag) {
            headers.push((IF_NONE_MATCH, value));
        }
    }

    if let Some(last_modified) = entry.header("last-modified") {
        if let Ok(value) = HeaderValue::from_str(last_modified) {
            headers.push((IF_MODIFIED_SINCE, value));
        }
    }

    headers
}

/// Whether a cached entry has any validator to revalidate with at all.
pub fn has_validators(entry: &CacheEntry) -> bool {
    entry.header("etag").is_some() || entry.header("last-modified").is_some()
}

/// Merges a `304 Not Modified` response's headers onto the stored entry,
/// per RFC 7234 §4.3.4: the stored body and status are kept, but any header
/// present on the 304 replaces the cached one (the origin is allowed to
/// update metadata like `Cache-Control` or `Date` on a revalidation).
pub fn merge_304(entry: &CacheEntry, response_headers: &std::collections::HashMap<String, String>) -> CacheEntry {
    let mut merged = entry.clone();
    for (name, value) in response_headers {
        merged.headers.insert(name.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry_with(headers: &[(&str, &str)]) -> CacheEntry {
        let mut map = HashMap::new();
        for (k, v) in headers {
            map.insert(k.to_string(), v.to_string());
        }
        CacheEntry::new("https://example.com/a", 200, None, map, vec![], None, "2024-01-01T00:00:00Z")
    }

    #[test]
    fn arms_if_none_match_from_cached_etag() {
        let entry = entry_with(&[("etag", "\"abc\"")]);
        let headers = conditional_headers(&entry);
        assert!(headers.iter().any(|(n, v)| n == IF_NONE_MATCH && v == "\"abc\""));
    }

    #[test]
    fn arms_if_modified_since_from_cached_last_modified() {
        let entry = entry_with(&[("last-modified", "Tue, 15 Nov 1994 12:45:26 GMT")]);
        let headers = conditional_headers(&entry);
        assert!(headers
            .iter()
            .any(|(n, v)| n == IF_MODIFIED_SINCE && v == "Tue, 15 Nov 1994 12:45:26 GMT"));
    }

    #[test]
    fn no_validators_yields_no_conditional_headers() {
        let entry = entry_with(&[]);
        assert!(conditional_headers(&entry).is_empty());
        assert!(!has_validators(&entry));
    }

    #[test]
    fn merge_304_overlays_headers_but_keeps_body() {
        let entry = entry_with(&[("etag", "\"abc\""), ("cache-control", "max-age=60")]);
        let mut new_headers = HashMap::new();
        new_headers.insert("cache-control".to_string(), "max-age=120".to_string());
        let merged = merge_304(&entry, &new_headers);
        assert_eq!(merged.header("cache-control"), Some("max-age=120"));
        assert_eq!(merged.header("etag"), Some("\"abc\""));
        assert_eq!(merged.body, entry.body);
        assert_eq!(merged.status_code, entry.status_code);
    }
}
