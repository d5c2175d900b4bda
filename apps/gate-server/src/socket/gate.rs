// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connection authentication gate, run once per Socket.IO handshake.
//!
//! Unlike the HTTP gate there is no identity lookup: verified claims are
//! attached to the socket as-is.

use serde::Serialize;
use serde_json::Value;
use socketioxide::extract::{Data, SocketRef, State};

use super::SocketState;
use crate::auth::{credential, Claims, TokenVerifier, VerifyError};
use crate::config::GateConfig;

/// Top-level message of every refusal.
pub const REFUSAL_MESSAGE: &str = "Authentication error";
pub const NO_TOKEN_PROVIDED: &str = "No token provided";
pub const TOKEN_NOT_AUTHENTICATED: &str = "Failed to authenticate token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefusalDetail {
    pub message: String,
}

/// Structured refusal: `{"message": "Authentication error", "data": {"message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Authentication error")]
pub struct ConnectionRefusal {
    pub message: &'static str,
    pub data: RefusalDetail,
}

impl ConnectionRefusal {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            message: REFUSAL_MESSAGE,
            data: RefusalDetail {
                message: detail.into(),
            },
        }
    }

    pub fn detail(&self) -> &str {
        &self.data.message
    }
}

#[derive(Clone)]
pub struct ConnectionGate {
    verifier: TokenVerifier,
}

impl ConnectionGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            verifier: TokenVerifier::new(config),
        }
    }

    /// Decide whether a handshake `auth` payload may open a connection.
    pub fn admit(&self, auth: &Value) -> Result<Claims, ConnectionRefusal> {
        let credential = credential::from_handshake(auth)
            .ok_or_else(|| ConnectionRefusal::new(NO_TOKEN_PROVIDED))?;

        self.verifier.verify(&credential).map_err(|err| {
            match &err {
                VerifyError::Invalid(reason) => {
                    tracing::debug!(reason = *reason, "Handshake token rejected");
                }
                fault => tracing::error!(error = %fault, "Token verifier fault during handshake"),
            }
            ConnectionRefusal::new(TOKEN_NOT_AUTHENTICATED)
        })
    }
}

/// Connect middleware: admits the socket and stores its claims, or refuses it.
pub async fn authenticate_connection(
    socket: SocketRef,
    Data(auth): Data<Value>,
    State(state): State<SocketState>,
) -> Result<(), ConnectionRefusal> {
    match state.gate.admit(&auth) {
        Ok(claims) => {
            tracing::debug!(socket_id = %socket.id, subject = %claims.sub, "Socket authenticated");
            socket.extensions.insert(claims);
            Ok(())
        }
        Err(refusal) => {
            tracing::debug!(
                socket_id = %socket.id,
                refusal = %serde_json::to_value(&refusal).unwrap_or_default(),
                "Socket refused"
            );
            Err(refusal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{claims_for, mint, mint_with_secret, now, test_config};
    use serde_json::json;

    fn gate() -> ConnectionGate {
        ConnectionGate::new(&test_config())
    }

    #[test]
    fn empty_token_is_refused_with_no_token_provided() {
        for auth in [json!({}), json!({"token": ""}), json!(null)] {
            let refusal = gate().admit(&auth).unwrap_err();
            assert_eq!(refusal.message, REFUSAL_MESSAGE);
            assert_eq!(refusal.detail(), NO_TOKEN_PROVIDED);
        }
    }

    #[test]
    fn bad_tokens_are_refused_with_failed_to_authenticate() {
        let tokens = [
            mint_with_secret(&claims_for("user_1"), "wrong-secret"),
            mint(&json!({"sub": "user_1", "exp": now() - 3600})),
            mint(&json!("just-a-string")),
            "garbage".to_string(),
        ];
        for token in tokens {
            let refusal = gate().admit(&json!({ "token": token })).unwrap_err();
            assert_eq!(refusal.detail(), TOKEN_NOT_AUTHENTICATED);
        }
    }

    #[test]
    fn unconfigured_secret_refuses_instead_of_admitting() {
        let gate = ConnectionGate::new(&GateConfig::unconfigured());
        let token = mint(&claims_for("user_1"));
        let refusal = gate.admit(&json!({ "token": token })).unwrap_err();
        assert_eq!(refusal.detail(), TOKEN_NOT_AUTHENTICATED);
    }

    #[test]
    fn valid_token_yields_claims_without_lookup() {
        // "user_9" exists in no store; the connection path trusts claims.
        let token = mint(&claims_for("user_9"));
        let claims = gate().admit(&json!({ "token": token })).unwrap();
        assert_eq!(claims.sub, "user_9");
        assert_eq!(claims.role.as_deref(), Some("buyer"));
    }

    #[test]
    fn refusal_serializes_with_nested_detail() {
        let refusal = ConnectionRefusal::new(NO_TOKEN_PROVIDED);
        assert_eq!(refusal.to_string(), "Authentication error");
        assert_eq!(
            serde_json::to_value(&refusal).unwrap(),
            json!({
                "message": "Authentication error",
                "data": {"message": "No token provided"}
            })
        );
    }
}
