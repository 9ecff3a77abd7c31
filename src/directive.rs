//! Parsing of `Cache-Control` directive lists.
//!
//! Request directives and response directives are parsed into the same
//! representation, but callers must keep track of which side a given
//! [`DirectiveMap`] came from — this crate never accepts one where the
//! other is expected (see the revalidation and stale-if-error modules).

use std::collections::BTreeMap;

/// A single `Cache-Control` directive: either a bare flag (`no-cache`) or a
/// flag with a value (`max-age=60`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Present,
    Value(String),
}

/// A parsed `Cache-Control` header, keyed by lowercase directive name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveMap(BTreeMap<String, Directive>);

impl DirectiveMap {
    /// Parses a raw `Cache-Control` header value. Unknown or malformed
    /// tokens are kept verbatim rather than rejected; only consumers that
    /// need a numeric value attempt further parsing, and fall back to
    /// "absent" on failure.
    pub fn parse(header_value: &str) -> Self {
        let mut map = BTreeMap::new();
        for part in header_value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((name, value)) => {
                    let name = name.trim().to_ascii_lowercase();
                    let value = value.trim().to_string();
                    map.insert(name, Directive::Value(value));
                }
                None => {
                    map.insert(part.to_ascii_lowercase(), Directive::Present);
                }
            }
        }
        DirectiveMap(map)
    }

    /// An empty directive map, as if no `Cache-Control` header was present.
    pub fn empty() -> Self {
        DirectiveMap(BTreeMap::new())
    }

    /// Whether a bare or valued directive with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The directive's value, if it has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Directive::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// The directive's value coerced to a non-negative integer number of
    /// seconds. Invalid or missing values both yield `None` rather than an
    /// error — an unparseable `max-age` is treated the same as an absent
    /// one.
    pub fn get_seconds(&self, name: &str) -> Option<i64> {
        self.get(name)?.parse::<i64>().ok()
    }
}
