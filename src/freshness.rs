//! RFC 7234 freshness classification.

use std::time::SystemTime;

use crate::directive::DirectiveMap;

/// The outcome of classifying a cached entry against the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The entry may be served as-is.
    Fresh,
    /// The entry must be revalidated (or refetched) before being served.
    Stale,
    /// The cache must not be consulted at all; go straight to the network.
    Transparent,
}

/// Classifies a cached response against the request that would otherwise
/// be served from it.
///
/// `response_date` is the cached response's `Date` header, parsed; `now` is
/// the current time. Follows the eight-step decision order:
///
/// 1. `no-cache` on the *request* forces `Transparent` (never serve from
///    cache, though the entry may still be revalidated and replaced).
/// 2. `no-cache` on the *response* forces `Stale` (must revalidate).
/// 3. `only-if-cached` on the request forces `Fresh` (never go to network —
///    the caller must already know whether an entry exists).
/// 4. Age is computed from the response's `Date` header, defaulting to
///    `now` when absent.
/// 5. The freshness lifetime is `max-age` if present, else derived from
///    `Expires`, else zero.
/// 6. `max-stale` on the request relaxes an otherwise-stale entry back to
///    fresh when `age - lifetime <= max_stale`.
/// 7. `min-fresh` on the request tightens an otherwise-fresh entry back to
///    stale when `lifetime - age < min_fresh`.
/// 8. Otherwise, fresh iff `age <= lifetime`.
pub fn classify(
    request_directives: &DirectiveMap,
    response_directives: &DirectiveMap,
    response_date: Option<SystemTime>,
    expires: Option<SystemTime>,
    now: SystemTime,
) -> Freshness {
    if request_directives.contains("no-cache") {
        return Freshness::Transparent;
    }
    if response_directives.contains("no-cache") {
        return Freshness::Stale;
    }
    if request_directives.contains("only-if-cached") {
        return Freshness::Fresh;
    }

    let age = age_seconds(response_date, now);
    let lifetime = freshness_lifetime_seconds(response_directives, response_date, expires);

    let mut fresh = age <= lifetime;

    if !fresh && request_directives.contains("max-stale") {
        match request_directives.get_seconds("max-stale") {
            // `max-stale` with no value relaxes staleness unconditionally.
            None => fresh = true,
            Some(max_stale) if age - lifetime <= max_stale => fresh = true,
            Some(_) => {}
        }
    }

    if fresh {
        if let Some(min_fresh) = request_directives.get_seconds("min-fresh") {
            if lifetime - age < min_fresh {
                fresh = false;
            }
        }
    }

    if fresh {
        Freshness::Fresh
    } else {
        Freshness::Stale
    }
}

fn age_seconds(response_date: Option<SystemTime>, now: SystemTime) -> i64 {
    let date = response_date.unwrap_or(now);
    now.duration_since(date).map(|d| d.as_secs() as i64).unwrap_or(0)
}

fn freshness_lifetime_seconds(
    response_directives: &DirectiveMap,
    response_date: Option<SystemTime>,
    expires: Option<SystemTime>,
) -> i64 {
    if let Some(max_age) = response_directives.get_seconds("max-age") {
        return max_age;
    }
    if let (Some(expires), Some(date)) = (expires, response_date) {
        return expires
            .duration_since(date)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn seconds_ago(secs: u64, now: SystemTime) -> SystemTime {
        now - Duration::from_secs(secs)
    }

    #[test]
    fn within_max_age_is_fresh() {
        let now = SystemTime::now();
        let date = seconds_ago(10, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::empty();
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Fresh
        );
    }

    #[test]
    fn beyond_max_age_is_stale() {
        let now = SystemTime::now();
        let date = seconds_ago(120, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::empty();
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Stale
        );
    }

    #[test]
    fn request_no_cache_is_transparent_even_if_fresh() {
        let now = SystemTime::now();
        let date = seconds_ago(1, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::parse("no-cache");
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Transparent
        );
    }

    #[test]
    fn response_no_cache_is_stale_even_if_within_max_age() {
        let now = SystemTime::now();
        let date = seconds_ago(1, now);
        let response = DirectiveMap::parse("no-cache, max-age=60");
        let request = DirectiveMap::empty();
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Stale
        );
    }

    #[test]
    fn only_if_cached_is_always_fresh_classification() {
        let now = SystemTime::now();
        let date = seconds_ago(1000, now);
        let response = DirectiveMap::parse("max-age=1");
        let request = DirectiveMap::parse("only-if-cached");
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Fresh
        );
    }

    #[test]
    fn max_stale_relaxes_a_stale_entry_back_to_fresh() {
        let now = SystemTime::now();
        let date = seconds_ago(70, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::parse("max-stale=30");
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Fresh
        );
    }

    #[test]
    fn bare_max_stale_relaxes_any_staleness_unconditionally() {
        let now = SystemTime::now();
        let date = seconds_ago(1000, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::parse("max-stale");
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Fresh
        );
    }

    #[test]
    fn min_fresh_tightens_a_fresh_entry_back_to_stale() {
        let now = SystemTime::now();
        let date = seconds_ago(50, now);
        let response = DirectiveMap::parse("max-age=60");
        let request = DirectiveMap::parse("min-fresh=30");
        assert_eq!(
            classify(&request, &response, Some(date), None, now),
            Freshness::Stale
        );
    }

    #[test]
    fn expires_header_used_when_max_age_absent() {
        let now = SystemTime::now();
        let date = seconds_ago(10, now);
        let expires = date + Duration::from_secs(60);
        let response = DirectiveMap::empty();
        let request = DirectiveMap::empty();
        assert_eq!(
            classify(&request, &response, Some(date), Some(expires), now),
            Freshness::Fresh
        );
    }

    #[test]
    fn missing_date_and_max_age_is_stale() {
        let now = SystemTime::now();
        let response = DirectiveMap::empty();
        let request = DirectiveMap::empty();
        assert_eq!(
            classify(&request, &response, None, None, now),
            Freshness::Stale
        );
    }
}
