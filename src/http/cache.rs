//! Cache-control metadata for successful responses.
//!
//! File downloads are never stored in a response cache themselves, but the
//! metadata is still computed and attached so callers can decide when to
//! re-fetch the file.

use reqwest::header::{HeaderMap, CACHE_CONTROL, DATE, ETAG, EXPIRES, LAST_MODIFIED};
use std::time::{Duration, SystemTime};

/// Freshness information derived from response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMeta {
    /// Value of the `ETag` header.
    pub etag: Option<String>,
    /// Value of the `Date` header.
    pub server_date: Option<SystemTime>,
    /// Value of the `Last-Modified` header.
    pub last_modified: Option<SystemTime>,
    /// Hard expiry: past this point the entry must not be used.
    pub ttl: SystemTime,
    /// Soft expiry: past this point the entry should be refreshed.
    pub soft_ttl: SystemTime,
}

impl CacheMeta {
    /// True if the hard expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.ttl < SystemTime::now()
    }

    /// True if the soft expiry has passed.
    pub fn refresh_needed(&self) -> bool {
        self.soft_ttl < SystemTime::now()
    }
}

/// Computes [`CacheMeta`] for a response.
///
/// With `use_server_control` unset, both expiries are simply `now +
/// cache_time`. Otherwise `Cache-Control` (`max-age`,
/// `stale-while-revalidate`, `must-revalidate`, `proxy-revalidate`) wins over
/// `Expires`/`Date`. `no-cache` and `no-store` yield `None`.
pub fn parse_cache_headers(
    use_server_control: bool,
    cache_time: Duration,
    headers: &HeaderMap,
) -> Option<CacheMeta> {
    parse_cache_headers_at(SystemTime::now(), use_server_control, cache_time, headers)
}

/// Same as [`parse_cache_headers`] with an explicit clock.
pub fn parse_cache_headers_at(
    now: SystemTime,
    use_server_control: bool,
    cache_time: Duration,
    headers: &HeaderMap,
) -> Option<CacheMeta> {
    let server_date = header_date(headers, DATE);
    let last_modified = header_date(headers, LAST_MODIFIED);
    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if !use_server_control {
        let expiry = now + cache_time;
        return Some(CacheMeta {
            etag,
            server_date,
            last_modified,
            ttl: expiry,
            soft_ttl: expiry,
        });
    }

    let mut has_cache_control = false;
    let mut must_revalidate = false;
    let mut max_age = 0u64;
    let mut stale_while_revalidate = 0u64;

    if let Some(value) = headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()) {
        has_cache_control = true;
        for token in value.split(',').map(str::trim) {
            let lower = token.to_ascii_lowercase();
            if lower == "no-cache" || lower == "no-store" {
                return None;
            } else if let Some(secs) = lower.strip_prefix("max-age=") {
                max_age = secs.parse().unwrap_or(0);
            } else if let Some(secs) = lower.strip_prefix("stale-while-revalidate=") {
                stale_while_revalidate = secs.parse().unwrap_or(0);
            } else if lower == "must-revalidate" || lower == "proxy-revalidate" {
                must_revalidate = true;
            }
        }
    }

    let expires = header_date(headers, EXPIRES);

    let (soft_ttl, ttl) = if has_cache_control {
        let soft = now + Duration::from_secs(max_age);
        let hard = if must_revalidate {
            soft
        } else {
            soft + Duration::from_secs(stale_while_revalidate)
        };
        (soft, hard)
    } else {
        match (server_date, expires) {
            (Some(date), Some(expires)) if expires >= date => {
                let lifetime = expires.duration_since(date).unwrap_or_default();
                let soft = now + lifetime;
                (soft, soft)
            }
            _ => (now, now),
        }
    };

    Some(CacheMeta {
        etag,
        server_date,
        last_modified,
        ttl,
        soft_ttl,
    })
}

fn header_date(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<SystemTime> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok())
}
