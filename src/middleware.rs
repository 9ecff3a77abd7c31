//! The transport abstraction this crate wraps.
//!
//! Modeled on the teacher's `Middleware` trait
//! (`is_method_get_head`/`parts`/`url`/`method`/`update_headers`/
//! `remote_fetch`), generalized per the design notes to drop the
//! `http-cache-semantics`-specific `policy*` methods — this crate computes
//! freshness itself — and to not require request cloning beyond a header
//! overlay, since the only outgoing mutation this crate ever performs is
//! adding conditional-request headers.

use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue};

use crate::directive::DirectiveMap;
use crate::error::Result;
use crate::response::HttpResponse;

/// A decorator-friendly capability over a single outgoing HTTP request.
///
/// A concrete implementation wraps one in-flight request for one transport
/// (reqwest, surf, ureq, hyper, a test double, …). The cache layer never
/// holds a concrete client; it only ever talks to this trait, which is what
/// lets [`crate::cache::HttpCache`] stay transport-agnostic and lets tests
/// substitute a canned [`MockMiddleware`](crate::cache::MockMiddleware)-style
/// double.
#[async_trait]
pub trait Middleware: Send {
    /// Whether the outgoing request's method is `GET` or `HEAD` — the only
    /// methods this crate ever caches.
    fn is_method_get_head(&self) -> bool;

    /// Whether the outgoing request carries a `Range` header. Range
    /// requests are never served from, or stored into, the cache.
    fn has_range_header(&self) -> bool;

    /// The outgoing request's method, upper-cased.
    fn method(&self) -> &str;

    /// The outgoing request's absolute URL.
    fn url(&self) -> &str;

    /// The outgoing request's own `Cache-Control` directives (e.g.
    /// `no-cache`, `only-if-cached`), read fresh on every call rather than
    /// cached, since [`Self::update_headers`] may add to them.
    fn request_directives(&self) -> DirectiveMap;

    /// Overlays the given headers onto the outgoing request, overwriting
    /// any existing value for the same name. Used to arm conditional
    /// revalidation and to force `Cache-Control: no-cache` on the `STALE`
    /// no-cache response-side path.
    fn update_headers(&mut self, headers: &[(HeaderName, HeaderValue)]) -> Result<()>;

    /// Sends the request to the network and awaits the full response body.
    /// Per the concurrency model, storage never happens until this
    /// completes — a cancelled `remote_fetch` simply never returns, so no
    /// partial entry is ever written.
    async fn remote_fetch(&mut self) -> Result<HttpResponse>;

    /// Convenience entry point for a caller that only wants to run this
    /// request through a cache, without naming [`crate::cache::HttpCache`]'s
    /// `send` directly — the crate's answer to the spec's "convenience
    /// method `get(url, …)` equivalent to `send(GET url)`", framed in terms
    /// of whatever concrete `Middleware` the caller already built.
    async fn send_via(&mut self, cache: &crate::cache::HttpCache) -> Result<HttpResponse>
    where
        Self: Sized,
    {
        cache.send(self).await
    }
}
