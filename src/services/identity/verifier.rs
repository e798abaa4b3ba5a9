//! Identity verifier interface used by the auth gate.
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Subject resolved from a bearer token by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: Uuid,
    pub email: Option<String>,
}

/// Verification failures.
///
/// The split matters to the caller:
/// - `Rejected`: the provider answered and refused the token (401)
/// - `Transport`: the call itself failed, the token was never judged (400)
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
}

/// Resolves a bearer token to an identity.
///
/// Returns:
/// - `Ok(Some(_))` => token accepted
/// - `Ok(None)`    => provider answered but resolved no user
/// - `Err(_)`      => see `IdentityError`
///
/// Implementations must be cheap to share across requests (held behind `Arc`).
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    // Backend name for logs.
    fn backend_name(&self) -> &'static str;

    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError>;
}
