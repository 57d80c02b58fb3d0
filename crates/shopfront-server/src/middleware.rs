use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The authenticated user, stored as a request extension by
/// [`require_bearer_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Bearer-token auth settings used by middleware. Each configured token
/// maps to the user it authenticates as.
#[derive(Debug, Clone)]
pub struct AuthState {
    tokens: Arc<HashMap<String, Uuid>>,
    pub enabled: bool,
}

/// Identity used when auth is disabled in development.
const DEV_USER: Uuid = Uuid::nil();

impl AuthState {
    /// Builds auth config from `SHOPFRONT_API_TOKENS`, a comma-separated
    /// list of `token:user-uuid` pairs.
    ///
    /// In development, empty/missing tokens disable auth for local
    /// iteration — every request then runs as a fixed dev user. In
    /// non-development envs, empty/missing tokens fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("SHOPFRONT_API_TOKENS").unwrap_or_default();
        let mut tokens = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((token, user)) = entry.split_once(':') else {
                anyhow::bail!("SHOPFRONT_API_TOKENS entries must look like 'token:user-uuid'");
            };
            let user_id = Uuid::parse_str(user.trim())
                .map_err(|e| anyhow::anyhow!("invalid user uuid in SHOPFRONT_API_TOKENS: {e}"))?;
            tokens.insert(token.trim().to_owned(), user_id);
        }

        if tokens.is_empty() {
            if is_development {
                tracing::warn!(
                    "SHOPFRONT_API_TOKENS not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    tokens: Arc::new(HashMap::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "SHOPFRONT_API_TOKENS is required outside development; \
                 provide comma-separated token:user-uuid pairs"
            );
        }

        Ok(Self {
            tokens: Arc::new(tokens),
            enabled: true,
        })
    }

    /// Builds auth state from an explicit token map (tests, embedders).
    #[must_use]
    pub fn with_tokens(tokens: HashMap<String, Uuid>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            enabled: true,
        }
    }

    /// Returns the user the token authenticates, comparing every candidate
    /// in constant time regardless of where (or whether) a match occurs.
    fn lookup(&self, token: &str) -> Option<Uuid> {
        let mut found = None;
        for (candidate, user_id) in self.tokens.iter() {
            if candidate.as_bytes().ct_eq(token.as_bytes()).into() {
                found = Some(*user_id);
            }
        }
        found
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled, and resolving the
/// token to an [`AuthUser`] for the handlers.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut().insert(AuthUser(DEV_USER));
        return next.run(req).await;
    }

    let user = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .and_then(|token| auth.lookup(token));

    match user {
        Some(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "unauthorized",
                    message: "missing or invalid bearer token",
                },
            }),
        )
            .into_response(),
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "rate_limited",
                    message: "rate limit exceeded",
                },
            }),
        )
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn auth_state_disables_when_no_tokens_in_dev() {
        std::env::remove_var("SHOPFRONT_API_TOKENS");
        let state = AuthState::from_env(true).expect("dev should allow missing tokens");
        assert!(!state.enabled);
    }

    #[test]
    fn lookup_maps_token_to_user() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut tokens = HashMap::new();
        tokens.insert("alpha".to_string(), user);
        tokens.insert("beta".to_string(), other);
        let state = AuthState::with_tokens(tokens);

        assert_eq!(state.lookup("alpha"), Some(user));
        assert_eq!(state.lookup("beta"), Some(other));
        assert_eq!(state.lookup("gamma"), None);
        assert_eq!(state.lookup(""), None);
    }
}
