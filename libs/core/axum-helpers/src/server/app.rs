use crate::errors::handlers::not_found;
use crate::http::{cors_layer, security_headers};
use crate::server::listener::Server;
use crate::server::shutdown::ShutdownCoordinator;
use axum::{Router, extract::DefaultBodyLimit, middleware, response::Redirect, routing::get};
use core_config::{http::HttpConfig, server::ServerConfig};
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Assembles the public router: API docs, `apis` nested under `/api`,
/// `site` (pages, probes, static files) at the root, a JSON 404 fallback and
/// the cross-cutting middleware stack over all of it.
///
/// Documentation is served at:
/// - `/swagger-ui` backed by `/api-docs/openapi.json` (`/api-docs`
///   redirects there)
/// - `/redoc`, `/rapidoc`, `/scalar`
///
/// Routes merged into the returned router afterwards skip the layers.
pub fn create_router<T>(apis: Router, site: Router, http: &HttpConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors = cors_layer(http)?;

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(http.request_timeout);

    let router = Router::new()
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, T::openapi()))
        .route(
            "/api-docs",
            get(|| async { Redirect::permanent(&format!("{}/", SWAGGER_UI_PATH)) }),
        )
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .merge(site)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(http.body_limit_bytes))
        .layer(timeout)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Runs the server until SIGINT/SIGTERM, drains in-flight requests, then
/// runs `cleanup` bounded by `cleanup_timeout`.
pub async fn serve_with_cleanup<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let signal_watcher = coordinator.clone();
    tokio::spawn(async move { signal_watcher.wait_for_signal().await });

    let server = Server::bind(router, server_config).await?;
    let waiter = coordinator.clone();
    let serve_result = server.serve_until(async move { waiter.wait().await }).await;

    info!(timeout = ?cleanup_timeout, "Running cleanup tasks");
    match tokio::time::timeout(cleanup_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(timeout = ?cleanup_timeout, "Cleanup exceeded timeout, forcing shutdown"),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "Test API"))]
    struct TestDoc;

    fn app() -> Router {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        let site = Router::new().route("/", get(|| async { "home" }));
        create_router::<TestDoc>(apis, site, &HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_site_routes_get_middleware() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_api_routes_are_nested() {
        let response = app()
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app()
            .oneshot(Request::get(OPENAPI_JSON_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["info"]["title"], "Test API");
    }

    #[tokio::test]
    async fn test_api_docs_redirects_to_swagger_ui() {
        let response = app()
            .oneshot(Request::get("/api-docs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers().get("location").unwrap(), "/swagger-ui/");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin_by_default() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/ping")
                    .header("origin", "http://storefront.test")
                    .header("access-control-request-method", "DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }
}
