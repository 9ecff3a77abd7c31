//! RFC 5861 `stale-if-error` evaluation.
//!
//! The `stale-if-error` directive is read from the cached *response's*
//! directives, not the outgoing request's — RFC 5861 defines it as a
//! response extension, and honoring a request-supplied value would let a
//! caller fabricate staleness tolerance the origin never granted.

use std::time::SystemTime;

use crate::directive::DirectiveMap;
use crate::entry::CacheEntry;

/// Whether `entry` may be served in place of a failed revalidation or
/// refetch, given its response directives and age.
pub fn is_eligible(
    response_directives: &DirectiveMap,
    response_date: Option<SystemTime>,
    now: SystemTime,
) -> bool {
    let Some(window) = response_directives.get_seconds("stale-if-error") else {
        return false;
    };
    let date = response_date.unwrap_or(now);
    let age = now
        .duration_since(date)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    age <= window
}

/// Convenience wrapper over [`is_eligible`] that parses the entry's own
/// `Cache-Control` and `Date` headers.
pub fn entry_is_eligible(entry: &CacheEntry, now: SystemTime) -> bool {
    let directives = entry
        .header("cache-control")
        .map(DirectiveMap::parse)
        .unwrap_or_else(DirectiveMap::empty);
    let date = entry.header("date").and_then(|d| httpdate::parse_http_date(d).ok());
    is_eligible(&directives, date, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn within_window_is_eligible() {
        let now = SystemTime::now();
        let date = now - Duration::from_secs(30);
        let directives = DirectiveMap::parse("stale-if-error=60");
        assert!(is_eligible(&directives, Some(date), now));
    }

    #[test]
    fn beyond_window_is_not_eligible() {
        let now = SystemTime::now();
        let date = now - Duration::from_secs(90);
        let directives = DirectiveMap::parse("stale-if-error=60");
        assert!(!is_eligible(&directives, Some(date), now));
    }

    #[test]
    fn missing_directive_is_not_eligible() {
        let now = SystemTime::now();
        let directives = DirectiveMap::empty();
        assert!(!is_eligible(&directives, Some(now), now));
    }
}
