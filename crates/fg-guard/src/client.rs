//! Client identity for rate limiting.
//!
//! The submission handler keys the rate limiter by an opaque client
//! identifier. These helpers derive one from the usual reverse-proxy
//! headers and hash it so raw addresses never land in the limiter
//! store or the logs.

use std::net::IpAddr;

use sha2::{Digest, Sha256};

/// Picks the client address out of proxy header values.
///
/// `X-Forwarded-For` wins (first address in its comma-separated list),
/// then `X-Real-IP`. Returns `None` when neither carries a parseable
/// address; the caller decides on a fallback key.
pub fn extract_client_ip(
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
) -> Option<IpAddr> {
    if let Some(value) = forwarded_for {
        if let Some(first) = value.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    if let Some(value) = real_ip {
        if let Ok(ip) = value.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }

    None
}

/// Hashes an arbitrary client identifier (IP, session token, ...) into
/// the opaque key the rate limiter stores.
pub fn client_key(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Convenience wrapper hashing an IP address.
pub fn client_key_for_ip(ip: &IpAddr) -> String {
    client_key(&ip.to_string())
}
