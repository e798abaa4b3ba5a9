//! access gate: bearer token → identity provider → AuthCtx in extensions
//!
//! Flow per request (nothing is cached between requests):
//! 1. `Authorization: <scheme> <token>` (second word); missing or malformed => 401 MissingToken
//! 2. identity provider verifies the token
//!    - rejected / no user       => 401 InvalidToken
//!    - provider call failed     => 400 AuthTransport (message surfaced)
//! 3. continue with `AuthCtx` inserted into the request extensions

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::AuthCtx;
use crate::services::identity::{IdentityError, IdentityVerifier};
use crate::state::AppState;

/// Puts the access gate in front of every route of `router`.
///
/// ```ignore
/// let users = middleware::auth::access::apply(users, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn can't take the State extractor in axum 0.8, hence from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Second whitespace-separated word of the `Authorization` header.
/// The scheme word is not checked; the provider judges whatever follows it.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    value.split_whitespace().nth(1)
}

/// The gate itself: either the continuation value or a terminal error.
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    headers: &HeaderMap,
) -> Result<AuthCtx, AppError> {
    let token = bearer_token(headers).ok_or(AppError::MissingToken)?;

    match verifier.verify(token).await {
        Ok(Some(identity)) => Ok(AuthCtx::new(identity.subject, identity.email)),
        Ok(None) => {
            tracing::warn!(
                backend = verifier.backend_name(),
                "identity provider resolved no user"
            );
            Err(AppError::InvalidToken)
        }
        Err(IdentityError::Rejected(reason)) => {
            tracing::warn!(
                backend = verifier.backend_name(),
                %reason,
                "access token rejected"
            );
            Err(AppError::InvalidToken)
        }
        Err(IdentityError::Transport(message)) => {
            tracing::warn!(
                backend = verifier.backend_name(),
                error = %message,
                "identity provider call failed"
            );
            Err(AppError::AuthTransport(message))
        }
    }
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = authenticate(state.identity.as_ref(), req.headers()).await?;

    tracing::debug!(subject = %auth_ctx.subject, "request authenticated");

    // middleware -> handler hand-off
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
