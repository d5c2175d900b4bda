// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP authentication gate for Axum.
//!
//! Runs extract → verify → resolve, short-circuiting on the first failure.
//! On success the resolved [`Identity`] is inserted into the request
//! extensions (keyed by its type) before the next stage runs; no rejection or
//! fault path touches the request. If the client goes away mid-call the
//! future is dropped, so a late lookup result never reaches the request.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/users/me", get(get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
//!     .with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{
    credential,
    resolver::{IdentityResolver, ResolveError},
    verifier::{TokenVerifier, VerifyError},
    AuthError,
};
use crate::config::GateConfig;
use crate::models::Identity;
use crate::state::AppState;
use crate::store::IdentityStore;

/// Token verification plus identity resolution for request/response calls.
#[derive(Clone)]
pub struct HttpAuthGate {
    verifier: TokenVerifier,
    resolver: IdentityResolver,
}

impl HttpAuthGate {
    pub fn new(config: &GateConfig, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            verifier: TokenVerifier::new(config),
            resolver: IdentityResolver::new(identities),
        }
    }

    /// Decide the outcome for one call from its headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let credential = credential::from_headers(headers)?;

        let claims = self.verifier.verify(&credential).map_err(|err| match err {
            VerifyError::Invalid(reason) => {
                tracing::debug!(reason, "Bearer token rejected");
                AuthError::InvalidToken
            }
            fault => {
                tracing::error!(error = %fault, "Token verifier fault");
                AuthError::VerifierFault(fault.to_string())
            }
        })?;

        self.resolver
            .resolve(&claims)
            .await
            .map_err(|err| match err {
                ResolveError::NotFound(subject) => {
                    tracing::debug!(%subject, "Token subject has no identity");
                    AuthError::IdentityNotFound
                }
                ResolveError::Fault(source) => {
                    tracing::error!(subject = %claims.sub, error = %source, "Identity lookup failed");
                    AuthError::ResolutionFault(source.to_string())
                }
            })
    }
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.auth_gate.authenticate(request.headers()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            if !err.is_fault() {
                tracing::debug!(
                    error_code = err.error_code(),
                    path = %request.uri().path(),
                    "Request rejected by authentication gate"
                );
            }
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        claims_for, identity, mint, mint_with_secret, now, seeded_store, test_config,
        FailingStore,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, HeaderValue, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    async fn gate() -> HttpAuthGate {
        HttpAuthGate::new(&test_config(), seeded_store().await)
    }

    #[tokio::test]
    async fn valid_token_resolves_identity() {
        let token = mint(&claims_for("user_1"));
        let resolved = gate().await.authenticate(&bearer(&token)).await.unwrap();
        assert_eq!(resolved, identity("user_1"));
    }

    #[tokio::test]
    async fn repeated_calls_yield_identical_identity() {
        let gate = gate().await;
        let token = mint(&claims_for("user_1"));

        let first = gate.authenticate(&bearer(&token)).await.unwrap();
        let second = gate.authenticate(&bearer(&token)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalid_tokens_are_rejected_as_401() {
        let gate = gate().await;
        let tokens = [
            mint_with_secret(&claims_for("user_1"), "wrong-secret"),
            mint(&json!({"sub": "user_1", "iat": now() - 7200, "exp": now() - 3600})),
            mint(&json!("just-a-string")),
            "definitely.not.a-jwt".to_string(),
        ];
        for token in tokens {
            let err = gate.authenticate(&bearer(&token)).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidToken), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn unknown_subject_is_401_not_500() {
        let token = mint(&claims_for("ghost"));
        let err = gate().await.authenticate(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn store_fault_is_500_not_401() {
        let gate = HttpAuthGate::new(&test_config(), Arc::new(FailingStore::default()));
        let token = mint(&claims_for("user_1"));
        let err = gate.authenticate(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::ResolutionFault(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unconfigured_secret_is_500() {
        let gate = HttpAuthGate::new(&crate::config::GateConfig::unconfigured(), seeded_store().await);
        let token = mint(&claims_for("user_1"));
        let err = gate.authenticate(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::VerifierFault(_)));
    }

    /// Router whose handler counts invocations and echoes the attached identity.
    async fn counting_app(state: AppState, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/protected",
                get(move |Extension(identity): Extension<Identity>| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        identity.id
                    }
                }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = HttpRequest::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn middleware_proceeds_once_with_identity_in_extensions() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = counting_app(crate::test_support::seeded_state().await, hits.clone()).await;
        let token = mint(&claims_for("user_1"));

        let (status, body) = call(app, Some(format!("Bearer {token}").as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"user_1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn middleware_never_calls_next_on_rejection() {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = crate::test_support::seeded_state().await;
        let expired = mint(&json!({"sub": "user_1", "exp": now() - 3600}));

        let cases = [
            (None, "Please Login"),
            (Some("Bearer".to_string()), "no access token found"),
            (Some("Basic dXNlcjpwYXNz".to_string()), "invalid token"),
            (Some(format!("Bearer {expired}")), "invalid token"),
            (
                Some(format!("Bearer {}", mint(&claims_for("ghost")))),
                "user not found",
            ),
        ];
        for (header, message) in cases {
            let app = counting_app(state.clone(), hits.clone()).await;
            let (status, body) = call(app, header.as_deref()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({ "message": message }));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn middleware_reports_store_fault_as_500() {
        let hits = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(FailingStore::default());
        let state = AppState::new(test_config(), store.clone(), store);
        let app = counting_app(state, hits.clone()).await;
        let token = mint(&claims_for("user_1"));

        let (status, body) = call(app, Some(format!("Bearer {token}").as_str())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Internal server down");
        assert_eq!(body["error"], "identity lookup failed");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
