/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - users: persistence handle, identity: token verifier
 * - must be cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::repos::user_repo::UserStore;
use crate::services::identity::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { users, identity }
    }
}
