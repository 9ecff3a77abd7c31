//! The HTTP integration layer: the eight-step pipeline that ties the
//! freshness engine, revalidation assembler, stale-if-error evaluator, and
//! tier coordinator together around a [`Middleware`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::SystemTime;

use crate::backend::Backend;
use crate::config::HttpCacheOptions;
use crate::directive::DirectiveMap;
use crate::entry::CacheEntry;
use crate::error::Result;
use crate::freshness::{self, Freshness};
use crate::middleware::Middleware;
use crate::response::HttpResponse;
use crate::revalidation;
use crate::stale_if_error;
use crate::tier::TierCoordinator;

/// A transparent caching layer over a [`Middleware`]-shaped transport.
///
/// Built once per application with its tier list and cacheable status set;
/// [`HttpCache::send`] is then called per outgoing request. Holds no
/// per-call state of its own — all mutable state lives in the tiers.
pub struct HttpCache {
    tiers: TierCoordinator,
    cacheable_status_codes: HashSet<u16>,
    options: HttpCacheOptions,
}

impl HttpCache {
    /// Builds a cache over `tiers` (fastest-to-slowest order) that treats
    /// `cacheable_status_codes` as storable. The default set is `{200}`;
    /// pass a larger set (e.g. `{200, 404}`) to also cache error responses
    /// the origin marks explicitly cacheable.
    pub fn new(tiers: Vec<Arc<dyn Backend>>, cacheable_status_codes: HashSet<u16>) -> Self {
        HttpCache::with_options(tiers, cacheable_status_codes, HttpCacheOptions::default())
    }

    /// As [`HttpCache::new`], with explicit [`HttpCacheOptions`].
    pub fn with_options(
        tiers: Vec<Arc<dyn Backend>>,
        cacheable_status_codes: HashSet<u16>,
        options: HttpCacheOptions,
    ) -> Self {
        HttpCache { tiers: TierCoordinator::new(tiers), cacheable_status_codes, options }
    }

    /// Runs `middleware`'s request through the full caching pipeline.
    pub async fn send(&self, middleware: &mut impl Middleware) -> Result<HttpResponse> {
        let cacheable = middleware.is_method_get_head() && !middleware.has_range_header();
        if !cacheable {
            let response = middleware.remote_fetch().await?;
            if !middleware.is_method_get_head() {
                // A mutating request (POST/PUT/DELETE/…) invalidates the
                // representation a subsequent GET on the same URL would
                // have served, even though this request's own fingerprint
                // was never looked up or stored.
                let get_key = self.options.key_for("GET", middleware.url());
                self.tiers.invalidate(&get_key).await;
            }
            return Ok(response);
        }

        let key = self.options.key_for(middleware.method(), middleware.url());
        let cached = self.tiers.lookup(&key).await;
        let request_directives = middleware.request_directives();
        let now = SystemTime::now();

        let Some(entry) = cached.as_ref() else {
            if request_directives.contains("only-if-cached") {
                log::debug!("only-if-cached miss for {key}, refusing network fetch");
                return Ok(self.not_cached_response(middleware.url()));
            }
            return self.forward_and_store(middleware, &key, None, now).await;
        };

        let response_directives = entry
            .header("cache-control")
            .map(DirectiveMap::parse)
            .unwrap_or_else(DirectiveMap::empty);
        let response_date = entry.header("date").and_then(|d| httpdate::parse_http_date(d).ok());
        let expires = entry.header("expires").and_then(|d| httpdate::parse_http_date(d).ok());

        match freshness::classify(&request_directives, &response_directives, response_date, expires, now) {
            Freshness::Fresh => {
                log::debug!("fresh hit for {key}");
                let mut response = HttpResponse::from_entry(entry);
                if self.options.cache_status_headers {
                    response.annotate_x_cache("hits");
                }
                Ok(response)
            }
            Freshness::Transparent => {
                log::debug!("request-side no-cache bypasses cache for {key}");
                self.forward_and_store(middleware, &key, Some(entry), now).await
            }
            Freshness::Stale => {
                log::debug!("stale entry for {key}, revalidating");
                let conditional = revalidation::conditional_headers(entry);
                if !conditional.is_empty() {
                    middleware.update_headers(&conditional)?;
                }
                self.forward_and_store(middleware, &key, Some(entry), now).await
            }
        }
    }

    /// The synthetic response returned for an `only-if-cached` request that
    /// misses the cache entirely, matching the "ENOTCACHED" convention of
    /// returning a `504` rather than ever touching the network.
    fn not_cached_response(&self, url: &str) -> HttpResponse {
        let mut response = HttpResponse {
            status: 504,
            reason: Some("Gateway Timeout".to_string()),
            url: url.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
            encoding: None,
        };
        if self.options.cache_status_headers {
            response.annotate_x_cache("miss");
        }
        response
    }

    /// Steps 5 through 8 of the pipeline: forward the (possibly
    /// conditional) request, then merge, store, invalidate, or pass through
    /// depending on the outcome.
    async fn forward_and_store(
        &self,
        middleware: &mut impl Middleware,
        key: &str,
        cached: Option<&CacheEntry>,
        now: SystemTime,
    ) -> Result<HttpResponse> {
        let response = match middleware.remote_fetch().await {
            Ok(response) => response,
            Err(err) => {
                if let Some(entry) = cached {
                    if stale_if_error::entry_is_eligible(entry, now) {
                        log::warn!("transport error for {key}, serving stale-if-error entry: {err}");
                        return Ok(self.stale_response(entry));
                    }
                }
                return Err(err);
            }
        };

        if response.status == 304 {
            if let Some(entry) = cached {
                log::debug!("304 for {key}, merging onto cached entry");
                let merged = revalidation::merge_304(entry, &response.headers);
                self.tiers.store(key, &merged, None).await;
                let mut out = HttpResponse::from_entry(&merged);
                if self.options.cache_status_headers {
                    out.annotate_x_cache("hits");
                }
                return Ok(out);
            }
            // A 304 with nothing to revalidate against is passed through
            // unchanged; there is no prior entry to merge it onto.
            return Ok(response);
        }

        if response.status >= 500 {
            if let Some(entry) = cached {
                if stale_if_error::entry_is_eligible(entry, now) {
                    log::warn!("{} from origin for {key}, serving stale-if-error entry", response.status);
                    return Ok(self.stale_response(entry));
                }
            }
            if !self.cacheable_status_codes.contains(&response.status) {
                self.tiers.invalidate(key).await;
            }
            return Ok(response);
        }

        let mut response = response;
        if !self.cacheable_status_codes.contains(&response.status) {
            self.tiers.invalidate(key).await;
            return Ok(response);
        }

        if !response.directives().contains("no-store") {
            let entry = response.clone().into_entry(now);
            self.tiers.store(key, &entry, None).await;
        }
        if self.options.cache_status_headers {
            response.annotate_x_cache("miss");
        }
        Ok(response)
    }

    fn stale_response(&self, entry: &CacheEntry) -> HttpResponse {
        let mut response = HttpResponse::from_entry(entry);
        if self.options.cache_status_headers {
            response.annotate_stale_warning();
            response.annotate_x_cache("hits");
        }
        response
    }
}
