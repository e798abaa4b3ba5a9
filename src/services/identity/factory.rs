/// Factory: build the identity verifier from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{IdentityError, IdentityVerifier, SupabaseVerifier};

pub fn build_identity_verifier(
    config: &Config,
) -> Result<Arc<dyn IdentityVerifier>, IdentityError> {
    let verifier = SupabaseVerifier::new(config.supabase_url.clone(), config.supabase_key.clone())?;

    Ok(Arc::new(verifier))
}
