//! CORS policy for the browser front-end.
//!
//! Policy:
//! - exactly one allowed origin (`CORS_ALLOWED_ORIGIN`), matched exactly
//! - credentials allowed, so methods/headers are listed explicitly (no wildcards)

use axum::Router;
use axum::http::{HeaderName, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - `allow_credentials(true)` panics at startup if combined with `Any`.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::exact(config.cors_allowed_origin.clone()))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/users".into()),
            "SUPABASE_URL" => Some("https://project.supabase.co".into()),
            "SUPABASE_KEY" => Some("anon-key".into()),
            "CORS_ALLOWED_ORIGIN" => Some("https://app.example.com".into()),
            _ => None,
        })
        .unwrap()
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/ping")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization,content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn configured_origin_gets_credentials() {
        let app = apply(Router::new().route("/ping", get(|| async { "pong" })), &config());

        let resp = app.oneshot(preflight("https://app.example.com")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "https://app.example.com"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn other_origins_get_no_cors_headers() {
        let app = apply(Router::new().route("/ping", get(|| async { "pong" })), &config());

        let resp = app.oneshot(preflight("https://evil.example.com")).await.unwrap();

        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
