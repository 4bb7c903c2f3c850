//! Shared harness: a test configuration, fake upstream servers and request
//! helpers around the assembled router.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use axum::response::Response;
use secrecy::SecretString;
use tower::ServiceExt;
use watchpost_storefront::config::{
    GitHubConfig, MailerConfig, StorefrontConfig, ZohoConfig, ZohoCredentials,
};
use watchpost_storefront::state::AppState;

pub const ADMIN_PASSWORD: &str = "tripod-lens-harbor-42";
pub const SEED_TOKEN: &str = "seed-token-for-tests";

/// Client address sent on rate limited routes.
pub const CLIENT_IP: &str = "203.0.113.7";

fn storefront_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront")
}

/// Configuration with every integration disabled and the hero file at `hero_path`.
pub fn config(hero_path: &Path) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        admin_password: SecretString::from(ADMIN_PASSWORD),
        seed_token: Some(SecretString::from(SEED_TOKEN)),
        hero_config_path: hero_path.to_path_buf(),
        content_dir: storefront_dir().join("content"),
        static_dir: storefront_dir().join("static"),
        zoho: ZohoConfig {
            accounts_url: "http://127.0.0.1:9".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            credentials: None,
        },
        github: None,
        mailer: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Zoho configuration pointing at a fake server.
pub fn zoho(base: &str) -> ZohoConfig {
    ZohoConfig {
        accounts_url: base.to_string(),
        api_url: format!("{base}/inventory/v1"),
        credentials: Some(ZohoCredentials {
            client_id: "1000.TEST".to_string(),
            client_secret: SecretString::from("integration-client-secret"),
            refresh_token: SecretString::from("1000.refresh"),
            organization_id: "600".to_string(),
        }),
    }
}

/// GitHub configuration pointing at a fake server.
pub fn github(base: &str) -> GitHubConfig {
    GitHubConfig {
        api_url: base.to_string(),
        token: SecretString::from("ghp_integration"),
        repo: "watchpost/site".to_string(),
        branch: "main".to_string(),
        path: "crates/storefront/content/hero.json".to_string(),
    }
}

/// Mailer configuration pointing at a fake server.
pub fn mailer(base: &str) -> MailerConfig {
    MailerConfig {
        api_url: base.to_string(),
        api_key: SecretString::from("re_integration"),
        from_address: "site@watchpost.example".to_string(),
        shop_address: "shop@watchpost.example".to_string(),
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

/// Build the application router.
pub fn app(config: StorefrontConfig) -> Router {
    watchpost_storefront::app(AppState::new(config).unwrap())
}

/// Request builder with the proxy client header set.
pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP)
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = request(Method::GET, uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST an urlencoded form.
pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = request(Method::POST, uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// POST a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response {
    let builder = request(Method::POST, uri).header(header::CONTENT_TYPE, "application/json");
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` pair of the named `Set-Cookie` header, if present.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(String::from)
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}
