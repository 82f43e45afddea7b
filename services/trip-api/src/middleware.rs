//! Telegram launch-payload authentication middleware.
//!
//! Runs inline on every request before resource handlers: extracts the raw
//! `initData` blob from the dedicated header (or the query-string fallback),
//! verifies it, resolves the principal, and attaches it to the request
//! extensions. Requests on the excluded-path allowlist bypass the subsystem
//! entirely.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower::{Layer, Service};

use crate::error::{ErrorDetail, ErrorResponse};
use crate::state::AppState;

/// Header carrying the raw launch payload
pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";

/// Query-string fallback parameter
const INIT_DATA_QUERY_PARAM: &str = "initData";

/// Path prefixes that bypass authentication: the validation endpoint itself,
/// API docs, and health probes. Fixed set, matched case-insensitively.
const EXCLUDED_PREFIXES: &[&str] = &["/api/telegram/validate", "/docs", "/health", "/ready"];

pub(crate) fn is_excluded_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Pull the `initData` value out of a raw query string. The value is
/// percent-encoded a second time in transit, so one decode layer comes off
/// here and the payload keeps its own encoding.
pub(crate) fn init_data_from_query(query: &str) -> Option<String> {
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == INIT_DATA_QUERY_PARAM {
                return urlencoding::decode(value).ok().map(|v| v.into_owned());
            }
        }
    }
    None
}

/// Extract the raw launch payload: header first, query string as fallback
fn extract_init_data(req: &Request<Body>) -> String {
    if let Some(value) = req.headers().get(INIT_DATA_HEADER) {
        if let Ok(s) = value.to_str() {
            return s.to_string();
        }
    }

    req.uri()
        .query()
        .and_then(init_data_from_query)
        .unwrap_or_default()
}

fn unauthorized(code: &str) -> Response {
    let body = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: "Authentication required".to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Tower layer that adds Telegram launch-payload authentication to requests
#[derive(Clone)]
pub struct TelegramAuthLayer {
    state: AppState,
}

impl TelegramAuthLayer {
    /// Create a new auth layer backed by the shared application state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for TelegramAuthLayer {
    type Service = TelegramAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TelegramAuthService {
            inner,
            state: self.state.clone(),
        }
    }
}

/// The Telegram authentication service
#[derive(Clone)]
pub struct TelegramAuthService<S> {
    inner: S,
    state: AppState,
}

impl<S> Service<Request<Body>> for TelegramAuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Swap in the clone so the polled-ready service handles this request
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let state = self.state.clone();

        Box::pin(async move {
            if is_excluded_path(req.uri().path()) {
                return inner.call(req).await;
            }

            let init_data = extract_init_data(&req);

            let verified = if init_data.is_empty() {
                false
            } else if state.config.dev_mode {
                // Trusted environment: payload accepted without verification
                true
            } else {
                let verdict = state.verifier.verify(&init_data);
                if let Some(reason) = verdict.reason {
                    tracing::warn!(
                        scheme = ?verdict.scheme,
                        reason = reason.code(),
                        "launch payload failed verification"
                    );
                }
                verdict.valid
            };

            match state.resolver.resolve(&init_data, verified).await {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    inner.call(req).await
                }
                Err(err) => {
                    tracing::debug!(code = err.error_code(), "request unauthenticated");
                    Ok(unauthorized(err.error_code()))
                }
            }
        })
    }
}
