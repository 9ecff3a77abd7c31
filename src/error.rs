//! Error types produced by this crate.

use thiserror::Error;

/// A boxed error from a storage backend or transport, kept opaque so this
/// crate never couples its public error type to any one backend's error
/// type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result type returned by the public API of this crate.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors produced while caching, revalidating, or storing an HTTP exchange.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A storage backend failed to complete an operation. The coordinator
    /// treats this as a miss for reads and logs it; it is only ever
    /// returned to a caller when every tier fails the same operation.
    #[error("cache backend error: {0}")]
    Backend(#[source] BoxError),

    /// A stored record could not be decoded back into a [`crate::entry::CacheEntry`].
    /// Treated as a miss by the tier coordinator, which also invalidates
    /// the offending key.
    #[error("failed to decode cache entry: {0}")]
    Decode(#[from] serde_json::Error),

    /// A stored record decoded successfully but carries a
    /// `schema_version` this build of the crate does not recognize.
    /// Treated the same as [`CacheError::Decode`] by callers.
    #[error("unsupported cache entry schema version {0}")]
    SchemaVersion(u8),

    /// An HTTP header value produced or consumed by this crate was invalid.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// An HTTP header name produced or consumed by this crate was invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// A header value could not be converted to a UTF-8 string.
    #[error("header value is not valid UTF-8: {0}")]
    HeaderToStr(#[from] http::header::ToStrError),

    /// A stored or constructed URI was invalid.
    #[error("invalid uri: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// Building an [`http::Response`] or [`http::Request`] failed.
    #[error("http error: {0}")]
    Http(#[from] http::Error),

    /// A cached or constructed HTTP version could not be represented.
    #[error("unsupported or unrecognized HTTP version")]
    BadVersion,

    /// A header required to complete an operation was absent or malformed.
    #[error("missing or malformed header")]
    BadHeader,

    /// The request URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
