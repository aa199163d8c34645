// Security middleware and CORS configuration
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Origins allowed besides the configured front end: LINE itself and LIFF.
const LINE_ORIGINS: [&str; 2] = ["https://line.me", "https://liff.line.me"];

/// Security headers middleware
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

pub fn get_cors_layer(frontend_url: &str) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = LINE_ORIGINS
        .iter()
        .map(|origin| HeaderValue::from_static(*origin))
        .collect();
    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(value) => origins.push(value),
        Err(_) => warn!("⚠️ Ignoring invalid FRONTEND_URL for CORS: {}", frontend_url),
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
