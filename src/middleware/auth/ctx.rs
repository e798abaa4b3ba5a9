/*
 * Responsibility
 * - the "authenticated request" context the access gate produces
 * - inserted into request extensions on success
 *
 * Notes
 * - handlers do not read it yet; the created user's id is still whatever the client
 *   sends, independent of `subject`
 */
use uuid::Uuid;

/// Context attached to a request that passed the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: Uuid,
    pub email: Option<String>,
}

impl AuthCtx {
    pub fn new(subject: Uuid, email: Option<String>) -> Self {
        Self { subject, email }
    }
}
