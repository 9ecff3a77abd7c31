//! Request fingerprinting.
//!
//! A cache key is the lowercase hex MD5 digest of `METHOD:URL`, where
//! `METHOD` is the uppercase HTTP method and `URL` is the request's
//! normalized absolute URL string.

use md5::{Digest, Md5};

/// Computes the cache key for a request.
///
/// ```
/// # use cachio::key::fingerprint;
/// let k = fingerprint("GET", "https://example.com/a");
/// assert_eq!(k.len(), 32);
/// ```
pub fn fingerprint(method: &str, url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b":");
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    hex_lower(&digest)
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(s, "{:02x}", b).expect("writing to a String cannot fail");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_method_and_url_yields_same_key() {
        let a = fingerprint("GET", "https://example.com/a");
        let b = fingerprint("GET", "https://example.com/a");
        assert_eq!(a, b);
    }

    #[test]
    fn different_methods_yield_different_keys() {
        let get = fingerprint("GET", "https://example.com/a");
        let head = fingerprint("HEAD", "https://example.com/a");
        assert_ne!(get, head);
    }

    #[test]
    fn method_is_case_normalized() {
        let lower = fingerprint("get", "https://example.com/a");
        let upper = fingerprint("GET", "https://example.com/a");
        assert_eq!(lower, upper);
    }

    #[test]
    fn key_is_32_char_lowercase_hex() {
        let k = fingerprint("POST", "https://example.com/submit");
        assert_eq!(k.len(), 32);
        assert!(k.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_urls_yield_different_keys() {
        let a = fingerprint("GET", "https://example.com/a");
        let b = fingerprint("GET", "https://example.com/b");
        assert_ne!(a, b);
    }
}
