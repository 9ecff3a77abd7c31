//! The on-disk/on-wire representation of a cached HTTP exchange.

use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Current version of the persisted [`CacheEntry`] shape. Bumped whenever a
/// field is added or removed in a way that changes the wire format; a
/// mismatch is treated as a decode failure rather than guessed at.
pub const SCHEMA_VERSION: u8 = 1;

/// A complete, cacheable HTTP response, storable and reconstructable
/// byte-for-byte, with everything the freshness and revalidation engines
/// need to classify it later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub schema_version: u8,
    pub url: String,
    pub status_code: u16,
    pub reason: Option<String>,
    /// Flattened, single-valued response headers. Multi-valued headers are
    /// joined by the transport before this entry is constructed.
    pub headers: HashMap<String, String>,
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
    /// Content character set hint from the origin response, carried through
    /// verbatim. Never consulted to decode `body` — the body is always
    /// treated as opaque bytes.
    pub encoding: Option<String>,
    /// ISO-8601 instant recording when this entry was stored.
    pub timestamp: String,
}

impl CacheEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: impl Into<String>,
        status_code: u16,
        reason: Option<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        encoding: Option<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        CacheEntry {
            schema_version: SCHEMA_VERSION,
            url: url.into(),
            status_code,
            reason,
            headers,
            body,
            encoding,
            timestamp: timestamp.into(),
        }
    }

    /// A case-insensitive header lookup. Header names are stored as given
    /// by the transport; this does a linear case-insensitive scan rather
    /// than normalizing at insertion time, matching the flattened-header
    /// contract described in the data model.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes this entry to its canonical JSON wire form, with the body
    /// base64-encoded, for text-only storage media (disk, Redis,
    /// Memcached).
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserializes an entry from its canonical JSON wire form. A
    /// `schema_version` mismatch is rejected rather than guessed at.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let entry: CacheEntry = serde_json::from_slice(bytes)?;
        if entry.schema_version != SCHEMA_VERSION {
            return Err(CacheError::SchemaVersion(entry.schema_version));
        }
        Ok(entry)
    }
}

/// Formats a [`SystemTime`] as an ISO-8601 / RFC 3339 UTC instant
/// (`2024-01-15T12:34:56Z`), with no fractional seconds. Implemented without
/// a date/time crate dependency since this crate's only other need for
/// calendar math, `Date`/`Expires` parsing, is already covered by `httpdate`.
pub fn iso8601(now: SystemTime) -> String {
    let secs = now
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let days = (secs / 86_400) as i64;
    let time_of_day = secs % 86_400;
    let (hour, minute, second) = (time_of_day / 3600, (time_of_day % 3600) / 60, time_of_day % 60);
    let (year, month, day) = civil_from_days(days);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

/// Howard Hinnant's `civil_from_days`: converts a day count since the Unix
/// epoch (1970-01-01) into a proleptic-Gregorian `(year, month, day)`.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

mod body_base64 {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
