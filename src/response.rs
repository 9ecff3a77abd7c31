//! The live response type passed between a [`crate::middleware::Middleware`],
//! the freshness/revalidation engine, and the tier coordinator.
//!
//! This is deliberately a plain, transport-agnostic value type — modeled on
//! the teacher's `HttpResponse` (`http-cache-types::HttpResponse`), but with
//! headers and body shaped to match [`crate::entry::CacheEntry`] directly so
//! reconstructing a response from storage, and capturing one for storage, is
//! a straight field copy rather than a re-encoding step.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::directive::DirectiveMap;
use crate::entry::CacheEntry;

/// Header name this crate sets to tell a caller how a response was produced.
pub const X_CACHE: &str = "x-cache";
/// Header name this crate sets when serving a stale entry under
/// `stale-if-error`.
pub const STALE_WARNING: &str = "stale-warning";

/// A complete HTTP response as seen by this crate: independent of any one
/// transport's response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Content character set hint from the transport, e.g. as guessed from
    /// `Content-Type`. Carried through to storage verbatim; never used to
    /// decode `body`.
    pub encoding: Option<String>,
}

impl HttpResponse {
    /// A case-insensitive header lookup, matching [`CacheEntry::header`].
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// This response's parsed `Cache-Control` directives, or an empty map if
    /// the header is absent.
    pub fn directives(&self) -> DirectiveMap {
        self.header("cache-control")
            .map(DirectiveMap::parse)
            .unwrap_or_else(DirectiveMap::empty)
    }

    /// This response's parsed `Date` header, if present and well-formed.
    pub fn date(&self) -> Option<SystemTime> {
        self.header("date").and_then(|d| httpdate::parse_http_date(d).ok())
    }

    /// This response's parsed `Expires` header, if present and well-formed.
    pub fn expires(&self) -> Option<SystemTime> {
        self.header("expires").and_then(|d| httpdate::parse_http_date(d).ok())
    }

    /// Sets (overwriting) the `X-Cache` annotation.
    pub fn annotate_x_cache(&mut self, value: &str) {
        self.headers.insert(X_CACHE.to_string(), value.to_string());
    }

    /// Adds the `Stale-Warning` annotation used on the stale-if-error path.
    pub fn annotate_stale_warning(&mut self) {
        self.headers
            .insert(STALE_WARNING.to_string(), r#"110 - "Response is stale""#.to_string());
    }

    /// Builds the response that will be stored. `now` stamps the entry's
    /// `timestamp`.
    pub fn into_entry(self, now: SystemTime) -> CacheEntry {
        CacheEntry::new(
            self.url,
            self.status,
            self.reason,
            self.headers,
            self.body,
            self.encoding,
            crate::entry::iso8601(now),
        )
    }

    /// Reconstructs a response from a stored entry, as returned to a caller
    /// on a cache hit.
    pub fn from_entry(entry: &CacheEntry) -> Self {
        HttpResponse {
            status: entry.status_code,
            reason: entry.reason.clone(),
            url: entry.url.clone(),
            headers: entry.headers.clone(),
            body: entry.body.clone(),
            encoding: entry.encoding.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("Cache-Control".to_string(), "max-age=60".to_string());
        HttpResponse {
            status: 200,
            reason: Some("OK".to_string()),
            url: "https://example.com/a".to_string(),
            headers,
            body: b"hi".to_vec(),
            encoding: Some("utf-8".to_string()),
        }
    }

    #[test]
    fn directives_parses_cache_control() {
        let r = response();
        assert_eq!(r.directives().get_seconds("max-age"), Some(60));
    }

    #[test]
    fn annotate_x_cache_overwrites_existing_value() {
        let mut r = response();
        r.annotate_x_cache("miss");
        r.annotate_x_cache("hits");
        assert_eq!(r.header("x-cache"), Some("hits"));
    }

    #[test]
    fn entry_round_trip_preserves_fields() {
        let r = response();
        let entry = r.clone().into_entry(SystemTime::now());
        let back = HttpResponse::from_entry(&entry);
        assert_eq!(back.status, r.status);
        assert_eq!(back.body, r.body);
        assert_eq!(back.header("cache-control"), r.header("cache-control"));
        assert_eq!(back.encoding, r.encoding);
    }
}
