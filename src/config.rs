//! Configuration surface for [`crate::cache::HttpCache`].
//!
//! Reduced from the teacher's `HttpCacheOptions` (`http-cache::HttpCacheOptions`)
//! down to the two knobs this crate's model actually has a use for: a custom
//! cache-key function, and whether to annotate responses with the `x-cache`
//! header at all.

use std::sync::Arc;

/// Overrides the default `METHOD:URL` MD5 fingerprint ([`crate::key::fingerprint`])
/// with a caller-supplied function, mirroring the teacher's `CacheKey`
/// callback shape.
pub type CacheKeyFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Options controlling [`crate::cache::HttpCache`] behavior beyond the
/// tier list and cacheable status set, which are constructor arguments.
#[derive(Clone)]
pub struct HttpCacheOptions {
    /// Overrides the default cache-key derivation. Receives `(method, url)`
    /// and returns the key to use; left `None` to use
    /// [`crate::key::fingerprint`].
    pub cache_key: Option<CacheKeyFn>,
    /// Whether to annotate responses with `x-cache` (and, on the
    /// stale-if-error path, `stale-warning`). Defaults to `true`; a caller
    /// that wants a transparent cache with no observable side channel can
    /// disable it.
    pub cache_status_headers: bool,
}

impl HttpCacheOptions {
    pub(crate) fn key_for(&self, method: &str, url: &str) -> String {
        match &self.cache_key {
            Some(f) => f(method, url),
            None => crate::key::fingerprint(method, url),
        }
    }
}

impl Default for HttpCacheOptions {
    fn default() -> Self {
        HttpCacheOptions { cache_key: None, cache_status_headers: true }
    }
}

impl std::fmt::Debug for HttpCacheOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCacheOptions")
            .field("cache_key", &self.cache_key.as_ref().map(|_| "Fn(..)"))
            .field("cache_status_headers", &self.cache_status_headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_fingerprint_key() {
        let options = HttpCacheOptions::default();
        assert_eq!(
            options.key_for("GET", "https://example.com/a"),
            crate::key::fingerprint("GET", "https://example.com/a")
        );
        assert!(options.cache_status_headers);
    }

    #[test]
    fn custom_cache_key_fn_overrides_default() {
        let options = HttpCacheOptions {
            cache_key: Some(Arc::new(|method, url| format!("{method}|{url}"))),
            ..Default::default()
        };
        assert_eq!(options.key_for("GET", "https://example.com/a"), "GET|https://example.com/a");
    }
}
