use autoani::domain::config::RateLimitConfig;
use autoani::kernel::server::ApiError;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const THROTTLED: &str = "Too many requests from this IP, please try again later.";
const LIMITED_PREFIX: &str = "/api/";
/// Full buckets are dropped once this many clients are tracked.
const SWEEP_THRESHOLD: usize = 10_000;
const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket per client address: `max_requests` tokens, refilled evenly over the window.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    buckets: Mutex<FxHashMap<String, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub(crate) fn new(cfg: &RateLimitConfig) -> Self {
        let capacity = f64::from(cfg.max_requests.max(1));
        let window = Duration::from_secs(cfg.window_secs.max(1)).as_secs_f64();

        Self {
            buckets: Mutex::new(FxHashMap::default()),
            capacity,
            refill_per_sec: capacity / window,
            trust_forwarded_for: cfg.trust_forwarded_for,
        }
    }

    /// Takes one token for `client`. `Err` carries the seconds until the next token.
    pub(crate) fn allow(&self, client: &str, now: Instant) -> Result<(), u64> {
        let mut buckets = self.buckets.lock();
        if buckets.len() >= SWEEP_THRESHOLD {
            buckets.retain(|_, bucket| self.refilled(bucket, now) < self.capacity);
        }

        let bucket = buckets
            .entry(client.to_owned())
            .or_insert(Bucket { tokens: self.capacity, last_refill: now });
        bucket.tokens = self.refilled(bucket, now);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let wait = (1.0 - bucket.tokens) / self.refill_per_sec;
            Err(Duration::try_from_secs_f64(wait).map_or(1, |d| d.as_secs().saturating_add(1)))
        }
    }

    fn refilled(&self, bucket: &Bucket, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity)
    }

    fn client_key(&self, request: &Request) -> String {
        if self.trust_forwarded_for
            && let Some(forwarded) = forwarded_for(request.headers())
        {
            return forwarded;
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| UNKNOWN_CLIENT.to_owned(), |ConnectInfo(addr)| addr.ip().to_string())
    }
}

/// First `X-Forwarded-For` hop, when it looks like an address.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() || first.len() > 64 {
        return None;
    }
    first
        .bytes()
        .all(|b| b.is_ascii_hexdigit() || b == b'.' || b == b':')
        .then(|| first.to_owned())
}

/// Rejects `/api/` requests over the client's budget with `429` and `Retry-After`.
pub(crate) async fn limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(LIMITED_PREFIX) {
        return next.run(request).await;
    }

    let client = limiter.client_key(&request);
    match limiter.allow(&client, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            debug!(%client, retry_after, "Rate limit exceeded");
            let mut response = ApiError::too_many_requests(THROTTLED).into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig { max_requests, window_secs, ..RateLimitConfig::default() })
    }

    #[test]
    fn budget_is_per_client() {
        let limiter = limiter(2, 60);
        let now = Instant::now();

        assert!(limiter.allow("10.0.0.1", now).is_ok());
        assert!(limiter.allow("10.0.0.1", now).is_ok());
        assert_eq!(limiter.allow("10.0.0.1", now), Err(31));
        assert!(limiter.allow("10.0.0.2", now).is_ok());
    }

    #[test]
    fn tokens_refill_over_the_window() {
        let limiter = limiter(1, 10);
        let start = Instant::now();

        assert!(limiter.allow("10.0.0.1", start).is_ok());
        assert!(limiter.allow("10.0.0.1", start + Duration::from_secs(5)).is_err());
        assert!(limiter.allow("10.0.0.1", start + Duration::from_secs(11)).is_ok());
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(forwarded_for(&headers).as_deref(), Some("203.0.113.7"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("<script>"));
        assert_eq!(forwarded_for(&headers), None);
    }
}
