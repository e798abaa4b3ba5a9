//! Supabase (GoTrue) backed identity verifier.
//!
//! Calls `GET {base}/auth/v1/user` with the project API key and the caller's bearer
//! token. Any non-2xx answer is a rejection; failing to reach the provider or to
//! decode its answer is a transport error.
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use super::verifier::{Identity, IdentityError, IdentityVerifier};

const USER_ENDPOINT: &str = "auth/v1/user";

#[derive(Debug, Deserialize)]
struct ProviderUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

// GoTrue has used several error shapes over time.
#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderError {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

/// The API key is not printable via Debug.
#[derive(Clone)]
pub struct SupabaseVerifier {
    http: reqwest::Client,
    user_url: Url,
    api_key: String,
}

impl std::fmt::Debug for SupabaseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseVerifier")
            .field("user_url", &self.user_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseVerifier {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        Self::with_client(http, base_url, api_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        mut base_url: Url,
        api_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let user_url = base_url
            .join(USER_ENDPOINT)
            .map_err(|e| IdentityError::Transport(format!("invalid identity provider url: {e}")))?;

        Ok(Self {
            http,
            user_url,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseVerifier {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let resp = self
            .http
            .get(self.user_url.clone())
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ProviderError>(&body)
                .ok()
                .and_then(ProviderError::into_message)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
            return Err(IdentityError::Rejected(format!(
                "{} {}",
                status.as_u16(),
                detail
            )));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let user = serde_json::from_slice::<Option<ProviderUser>>(&body).map_err(|e| {
            IdentityError::Transport(format!("undecodable identity provider response: {e}"))
        })?;

        let identity = user.and_then(|u| {
            let subject = u.id.as_deref().and_then(|id| Uuid::parse_str(id).ok())?;
            Some(Identity {
                subject,
                email: u.email,
            })
        });

        Ok(identity)
    }
}
