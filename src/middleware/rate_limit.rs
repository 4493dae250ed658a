use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{broadcast, Mutex};

use crate::response::AppError;
use crate::state::AppState;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u64,
    window_start: Instant,
}

/// Fixed-window request counter keyed by client IP.
#[derive(Debug)]
pub struct RateLimitState {
    window: Duration,
    max_requests: u64,
    entries: Mutex<HashMap<IpAddr, WindowEntry>>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Seconds until the current window closes.
    pub reset_after: u64,
}

impl RateLimitState {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs.max(1)),
            max_requests,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, ip: IpAddr) -> RateLimitDecision {
        let now = Instant::now();
        let mut map = self.entries.lock().await;

        let entry = map.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.window {
            *entry = WindowEntry {
                count: 0,
                window_start: now,
            };
        }

        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        let elapsed = now.duration_since(entry.window_start);
        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after: self.window.saturating_sub(elapsed).as_secs(),
        }
    }

    /// Drop windows idle for more than two periods.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut map = self.entries.lock().await;
        let before = map.len();
        map.retain(|_, entry| now.duration_since(entry.window_start) <= self.window * 2);
        before - map.len()
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let ip = extract_client_ip(req.headers(), peer, state.config().trust_proxy);
    let decision = state.rate_limit().check(ip).await;

    if !decision.allowed {
        tracing::warn!(client_ip = %ip, "Rate limit exceeded");
        let mut response = AppError::too_many_requests("Too many requests").into_response();

        apply_rate_limit_headers(&mut response, &decision);
        response
            .headers_mut()
            .insert("retry-after", HeaderValue::from(decision.reset_after));
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(&mut response, &decision);
    response
}

fn apply_rate_limit_headers(response: &mut Response, decision: &RateLimitDecision) {
    let reset_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        + decision.reset_after;

    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(reset_at));
}

/// Forwarding headers are honoured only behind a trusted proxy; otherwise the peer address is used.
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
            });
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

pub async fn rate_limit_cleanup_loop(
    limiter: Arc<RateLimitState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = limiter.cleanup().await;
                if removed > 0 {
                    tracing::debug!(removed, "Expired rate limit windows removed");
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn within_limit_is_allowed() {
        let limiter = RateLimitState::new(60, 2);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limiter.check(ip).await.allowed);
        assert!(limiter.check(ip).await.allowed);
        let third = limiter.check(ip).await;
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
        assert!(third.reset_after <= 60);
    }

    #[tokio::test]
    async fn separate_ips_have_separate_windows() {
        let limiter = RateLimitState::new(60, 1);
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        assert!(limiter.check(a).await.allowed);
        assert!(!limiter.check(a).await.allowed);
        assert!(limiter.check(b).await.allowed);
    }

    #[tokio::test]
    async fn cleanup_keeps_fresh_entries() {
        let limiter = RateLimitState::new(60, 1);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limiter.check(ip).await.allowed);
        assert_eq!(limiter.cleanup().await, 0);
        assert!(!limiter.check(ip).await.allowed);
    }

    #[test]
    fn extract_ip_fallbacks() {
        let headers = HeaderMap::new();
        assert_eq!(
            extract_client_ip(&headers, None, false),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
        let peer = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 9));
        assert_eq!(extract_client_ip(&headers, Some(peer), true), peer);
    }

    #[test]
    fn forwarded_for_only_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 10.0.0.1"));
        assert_eq!(
            extract_client_ip(&headers, None, true),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))
        );
        assert_eq!(
            extract_client_ip(&headers, None, false),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }
}
