//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `login_rate_limiter`: strict limits for the admin password check (~10/min)
//! - `form_rate_limiter`: relaxed limits for contact and checkout posts (~60/min)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers carrying the client IP, in order of trust.
const CLIENT_IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-forwarded-for", "x-real-ip"];

/// Shared key for requests whose client address is unknown.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Key extractor that reads the client IP from reverse-proxy headers.
///
/// For `X-Forwarded-For` the first address in the chain is used. Without
/// proxy headers the peer address is used; requests with neither share one
/// bucket keyed on `0.0.0.0`.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req.headers())
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .unwrap_or(UNKNOWN_CLIENT))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn limiter(replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("rate limiter period and burst are non-zero");
    GovernorLayer::new(Arc::new(config))
}

/// Limiter for `/api/admin/login`: one token every 6 seconds, burst of 5.
///
/// # Panics
///
/// Never in practice; the configuration constants are non-zero.
#[must_use]
pub fn login_rate_limiter() -> RateLimiterLayer {
    limiter(6, 5)
}

/// Limiter for contact and checkout submissions: one token per second, burst of 20.
///
/// # Panics
///
/// Never in practice; the configuration constants are non-zero.
#[must_use]
pub fn form_rate_limiter() -> RateLimiterLayer {
    limiter(1, 20)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let map = headers(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.9"),
        ]);
        assert_eq!(client_ip(&map), "203.0.113.9".parse::<IpAddr>().ok());
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let map = headers(&[("x-forwarded-for", "198.51.100.4, 10.0.0.1")]);
        assert_eq!(client_ip(&map), "198.51.100.4".parse::<IpAddr>().ok());
    }

    #[test]
    fn test_missing_headers() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
        assert_eq!(client_ip(&headers(&[("x-real-ip", "garbage")])), None);
    }

    #[test]
    fn test_extract_prefers_proxy_header_over_peer() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "198.51.100.4")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50_000))));
        assert_eq!(
            ProxyIpKeyExtractor.extract(&req).unwrap(),
            "198.51.100.4".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_extract_falls_back_to_peer_address() {
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 50_000))));
        assert_eq!(
            ProxyIpKeyExtractor.extract(&req).unwrap(),
            IpAddr::from([192, 0, 2, 10])
        );
    }

    #[test]
    fn test_extract_without_any_address_uses_shared_key() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(ProxyIpKeyExtractor.extract(&req).unwrap(), UNKNOWN_CLIENT);
    }
}
