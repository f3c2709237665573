//! Middleware de Rate Limiting
//!
//! Ventana fija por IP de cliente. La IP sale de la conexión TCP; la primera
//! entrada de `x-forwarded-for` sólo se usa con `TRUST_PROXY=true`.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_proxy: bool,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let mut state = Self::with_limits(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        );
        state.trust_proxy = config.trust_proxy;
        state
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_proxy: false,
        }
    }

    /// Registrar una request; `false` si la IP ya agotó su ventana
    pub async fn check_rate_limit(&self, ip: &str) -> bool {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return false;
        }

        info.requests += 1;
        true
    }
}

fn forwarded_ip(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// IP del cliente; sin `ConnectInfo` (router servido sin ella) todas las
/// requests comparten la clave `unknown`
fn client_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request, state.rate_limit.trust_proxy);

    if !state.rate_limit.check_rate_limit(&ip).await {
        warn!(ip = %ip, "🚦 Rate limit excedido");
        return Err(AppError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await);
        assert!(state.check_rate_limit("10.0.0.1").await);
        assert!(!state.check_rate_limit("10.0.0.1").await);

        // Otra IP tiene su propia ventana
        assert!(state.check_rate_limit("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_window_expires() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await);
        assert!(!state.check_rate_limit("10.0.0.1").await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("10.0.0.1").await);
    }

    fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request {
        let mut builder = Request::builder();
        if let Some(forwarded_for) = forwarded_for {
            builder = builder.header("x-forwarded-for", forwarded_for);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn test_client_ip_uses_socket_address() {
        let request = request_from("192.168.1.10:51000", Some("1.2.3.4"));
        assert_eq!(client_ip(&request, false), "192.168.1.10");
    }

    #[test]
    fn test_client_ip_behind_trusted_proxy() {
        let request = request_from("10.0.0.1:8080", Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&request, true), "203.0.113.7");

        let request = request_from("10.0.0.1:8080", None);
        assert_eq!(client_ip(&request, true), "10.0.0.1");
    }
}
