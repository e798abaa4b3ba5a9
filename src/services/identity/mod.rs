pub mod factory;
pub mod supabase;
pub mod verifier;

pub use factory::build_identity_verifier;
pub use supabase::SupabaseVerifier;
pub use verifier::{Identity, IdentityError, IdentityVerifier};
