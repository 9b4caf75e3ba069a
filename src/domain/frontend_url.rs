//! Frontend base URL used to build QR code links.
//!
//! The menu frontend is served from the same LAN host as the gateway, and
//! that host's address can change when the venue's Wi-Fi reassigns it.
//! [`FrontendUrlResolver`] owns a [`CachedUrl`] that is refreshed on read
//! once it expires.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;

/// Discovers the host's LAN address.
#[async_trait]
pub trait HostProbe: Send + Sync + fmt::Debug {
    /// Returns a non-loopback address of this host, if one is routable.
    async fn local_ip(&self) -> Option<IpAddr>;
}

/// Probes the outbound route by connecting a UDP socket.
///
/// `connect` on a UDP socket only selects a route; no packet is sent.
#[derive(Debug, Clone)]
pub struct RouteProbe {
    target: String,
}

impl RouteProbe {
    /// Creates a probe that routes towards `target` (`host:port`).
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Default for RouteProbe {
    fn default() -> Self {
        Self::new("8.8.8.8:53")
    }
}

#[async_trait]
impl HostProbe for RouteProbe {
    async fn local_ip(&self) -> Option<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0").await.ok()?;
        socket.connect(self.target.as_str()).await.ok()?;
        let ip = socket.local_addr().ok()?.ip();
        (!ip.is_loopback() && !ip.is_unspecified()).then_some(ip)
    }
}

/// A cached URL value and the moment it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUrl {
    /// The cached frontend base URL.
    pub value: String,
    /// Instant after which `value` must be refreshed.
    pub expires_at: Instant,
}

impl CachedUrl {
    /// Returns `true` while the cached value may still be served.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Resolves the frontend base URL with a time-to-live cache.
#[derive(Debug)]
pub struct FrontendUrlResolver {
    probe: Arc<dyn HostProbe>,
    port: u16,
    fallback: String,
    ttl: Duration,
    cache: Mutex<Option<CachedUrl>>,
}

impl FrontendUrlResolver {
    /// Creates a resolver.
    ///
    /// `fallback` is served when the probe finds no LAN address.
    #[must_use]
    pub fn new(probe: Arc<dyn HostProbe>, port: u16, fallback: String, ttl: Duration) -> Self {
        Self {
            probe,
            port,
            fallback,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Returns the frontend base URL, refreshing it if the cache expired.
    pub async fn resolve(&self) -> String {
        self.resolve_at(Instant::now()).await
    }

    /// Same as [`Self::resolve`] with an explicit clock reading.
    pub async fn resolve_at(&self, now: Instant) -> String {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.is_fresh(now)
        {
            return cached.value.clone();
        }

        let value = match self.probe.local_ip().await {
            Some(ip) => format!("http://{}:{}", format_host(ip), self.port),
            None => {
                tracing::debug!(fallback = %self.fallback, "no LAN address found");
                self.fallback.clone()
            }
        };
        *cache = Some(CachedUrl {
            value: value.clone(),
            expires_at: now + self.ttl,
        });
        value
    }

    /// Builds the link encoded in a table's QR code.
    #[must_use]
    pub fn qr_url(base: &str, token: &str) -> String {
        format!("{base}?t={token}")
    }
}

/// Brackets IPv6 addresses for use in a URL authority.
fn format_host(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedProbe {
        ip: Option<IpAddr>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HostProbe for FixedProbe {
        async fn local_ip(&self) -> Option<IpAddr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ip
        }
    }

    fn resolver(ip: Option<IpAddr>, ttl: Duration) -> (Arc<FixedProbe>, FrontendUrlResolver) {
        let probe = Arc::new(FixedProbe {
            ip,
            calls: AtomicUsize::new(0),
        });
        let resolver = FrontendUrlResolver::new(
            Arc::clone(&probe) as Arc<dyn HostProbe>,
            9111,
            "http://fallback:9111".to_string(),
            ttl,
        );
        (probe, resolver)
    }

    #[tokio::test]
    async fn builds_url_from_probe() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20));
        let (_, resolver) = resolver(Some(ip), Duration::from_secs(30));
        assert_eq!(resolver.resolve().await, "http://192.168.1.20:9111");
    }

    #[tokio::test]
    async fn falls_back_without_lan_address() {
        let (_, resolver) = resolver(None, Duration::from_secs(30));
        assert_eq!(resolver.resolve().await, "http://fallback:9111");
    }

    #[tokio::test]
    async fn serves_cached_value_until_expiry() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        let (probe, resolver) = resolver(Some(ip), Duration::from_secs(30));
        let start = Instant::now();

        resolver.resolve_at(start).await;
        resolver.resolve_at(start + Duration::from_secs(10)).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);

        resolver.resolve_at(start + Duration::from_secs(31)).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn qr_url_appends_token() {
        assert_eq!(
            FrontendUrlResolver::qr_url("http://h:9111", "tok"),
            "http://h:9111?t=tok"
        );
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let ip: IpAddr = std::net::Ipv6Addr::LOCALHOST.into();
        assert_eq!(format_host(ip), "[::1]");
    }
}
