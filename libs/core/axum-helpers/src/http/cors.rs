use axum::http::{HeaderValue, Method, header};
use core_config::http::HttpConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Builds the CORS layer from [`HttpConfig`].
///
/// An empty origin list allows any origin (`*`). Credentials are never
/// allowed since the API issues no cookies.
pub fn cors_layer(http: &HttpConfig) -> io::Result<CorsLayer> {
    let origin = if http.allows_any_origin() {
        info!("CORS configured for any origin");
        AllowOrigin::from(Any)
    } else {
        let origins = http
            .cors_allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
                )
            })?;
        info!(origins = ?http.cors_allowed_origins, "CORS configured with allowed origins");
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_origin_by_default() {
        assert!(cors_layer(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let http = HttpConfig {
            cors_allowed_origins: vec!["bad\norigin".to_string()],
            ..HttpConfig::default()
        };
        let err = cors_layer(&http).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
