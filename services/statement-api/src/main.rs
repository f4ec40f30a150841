use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::Json,
    routing::get,
    serve, Router,
};
use bankdoc_database::{initialize_stores, Stores};
use bankdoc_utils::{init_logging, AppConfig};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod handlers;
mod ingestion;
mod metrics;
mod middleware;
mod pdf_processor;
mod routes;
#[cfg(test)]
mod test_support;

use ingestion::IngestionPipeline;
use middleware::*;
use pdf_processor::PdfTextExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Bankdoc statement API");

    let stores = initialize_stores(&config.database).await?;
    info!(backend = ?stores.backend, "Statement store ready");

    let pipeline = IngestionPipeline::new(
        stores.statements.clone(),
        Arc::new(PdfTextExtractor::new()),
        &config.storage.scratch_dir,
    );

    let state = AppState {
        stores,
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };
    let app = create_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Statement API listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    let body_limit = state.config.server.max_request_size;

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))

        // API routes
        .nest("/api/v1", routes::create_api_routes())

        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::DELETE])
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                )
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )

        // Application state
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub pipeline: Arc<IngestionPipeline>,
    pub config: AppConfig,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "bankdoc-statement-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler() -> String {
    use prometheus::TextEncoder;

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{statement_text, PlainTextExtractor};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bankdoc_database::MemoryStore;
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    const BOUNDARY: &str = "bankdoc-test-boundary";

    struct TestApp {
        router: Router,
        store: MemoryStore,
        scratch_dir: PathBuf,
    }

    impl TestApp {
        fn new() -> Self {
            let store = MemoryStore::new();
            let stores = Stores::from_memory(store.clone());
            let scratch_dir =
                std::env::temp_dir().join(format!("bankdoc-api-test-{}", uuid::Uuid::new_v4()));

            let pipeline = IngestionPipeline::new(
                stores.statements.clone(),
                Arc::new(PlainTextExtractor),
                &scratch_dir,
            );
            let router = create_app(AppState {
                stores,
                pipeline: Arc::new(pipeline),
                config: AppConfig::default(),
            });

            Self {
                router,
                store,
                scratch_dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, body)
        }

        async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
            self.send(json_request(
                "POST",
                "/api/v1/users/register",
                json!({ "email": email, "password": password }),
            ))
            .await
        }

        async fn login(&self, email: &str, password: &str) -> String {
            let (status, body) = self
                .send(json_request(
                    "POST",
                    "/api/v1/auth/access-token",
                    json!({ "email": email, "password": password }),
                ))
                .await;
            assert_eq!(status, StatusCode::OK);
            body["access_token"].as_str().unwrap().to_string()
        }

        async fn upload(&self, token: &str, field: &str, bytes: &[u8]) -> (StatusCode, Value) {
            self.send(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/bank/process_bank_statement")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(multipart_body(field, bytes)))
                    .unwrap(),
            )
            .await
        }

        async fn list(&self, token: &str) -> (StatusCode, Value) {
            self.send(
                Request::builder()
                    .uri("/api/v1/bank/get_bank_statements")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
        }
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.scratch_dir).ok();
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"statement.pdf\"\r\n",
                field
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_detailed_health_check_reports_store() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Request::builder().uri("/api/v1/health/detailed").body(Body::empty()).unwrap())
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["statement_store"]["status"], "healthy");
        assert_eq!(body["checks"]["statement_store"]["backend"], "memory");
    }

    #[tokio::test]
    async fn test_register_and_read_current_user() {
        let app = TestApp::new();
        let (status, body) = app.register("Alice@Example.com", "correct horse").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "alice@example.com");
        assert!(body.get("hashed_password").is_none());

        let token = app.login("alice@example.com", "correct horse").await;
        let (status, me) = app
            .send(
                Request::builder()
                    .uri("/api/v1/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], body["id"]);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_and_short_password() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;

        let (status, body) = app.register("ALICE@example.com", "another one").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, body) = app.register("bob@example.com", "short").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/v1/auth/access-token",
                json!({ "email": "alice@example.com", "password": "battery staple" }),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHENTICATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_then_duplicate_then_list() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;
        let token = app.login("alice@example.com", "correct horse").await;

        let first = statement_text("B100", "2023-01");
        let (status, body) = app.upload(&token, "bank_statement", first.as_bytes()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"]["period"], "2023-01");
        assert_eq!(body["success"]["contract_number"], "B100");
        assert!(body["error"].is_null());

        let (status, body) = app.upload(&token, "bank_statement", first.as_bytes()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["success"].is_null());
        assert_eq!(
            body["error"]["message"],
            "Bank statement with the same content already exists"
        );
        assert!(body["error"]["details"].as_str().unwrap().contains("Duplicate"));

        let second = statement_text("A200", "2023-02");
        let (status, _) = app.upload(&token, "bank_statement", second.as_bytes()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.list(&token).await;
        assert_eq!(status, StatusCode::OK);
        let contracts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["contract_number"].as_str().unwrap())
            .collect();
        assert_eq!(contracts, vec!["A200", "B100"]);
        assert_eq!(app.store.statement_count().await, 2);
    }

    #[tokio::test]
    async fn test_upload_accepts_first_file_field() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;
        let token = app.login("alice@example.com", "correct horse").await;

        let text = statement_text("C300", "2023-03");
        let (status, body) = app.upload(&token, "file", text.as_bytes()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"]["contract_number"], "C300");
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_structured_error() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;
        let token = app.login("alice@example.com", "correct horse").await;

        let (status, body) = app.upload(&token, "bank_statement", &[0xff, 0xfe, 0x00]).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["success"].is_null());
        assert_eq!(body["error"]["message"], "Error processing bank statement");
        assert!(body["error"]["details"].is_string());

        let (status, body) = app.upload(&token, "bank_statement", b"too\nshort").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "Error processing bank statement");

        assert_eq!(app.store.statement_count().await, 0);
    }

    #[tokio::test]
    async fn test_bank_routes_require_token() {
        let app = TestApp::new();

        let (status, body) = app.list("not-a-real-token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHENTICATION_ERROR");

        let (status, _) = app
            .send(
                Request::builder()
                    .uri("/api/v1/bank/get_bank_statements")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let text = statement_text("B100", "2023-01");
        let (status, _) = app.upload("bad token!", "bank_statement", text.as_bytes()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(app.store.statement_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_current_user_cascades() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;
        let token = app.login("alice@example.com", "correct horse").await;

        let text = statement_text("B100", "2023-01");
        app.upload(&token, "bank_statement", text.as_bytes()).await;
        assert_eq!(app.store.statement_count().await, 1);

        let (status, _) = app
            .send(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.store.statement_count().await, 0);

        let (status, _) = app.list(&token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_exports_statement_counter() {
        let app = TestApp::new();
        app.register("alice@example.com", "correct horse").await;
        let token = app.login("alice@example.com", "correct horse").await;
        let text = statement_text("M1", "2023-04");
        app.upload(&token, "bank_statement", text.as_bytes()).await;

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("bankdoc_statements_processed_total"));
    }
}
