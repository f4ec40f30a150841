use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let mut health_status = json!({
        "status": "healthy",
        "service": "bankdoc-statement-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    let store_status = match state.stores.statements.health_check().await {
        Ok(_) => json!({"status": "healthy", "backend": state.stores.backend}),
        Err(e) => json!({"status": "unhealthy", "backend": state.stores.backend, "message": e.to_string()}),
    };
    let healthy = store_status["status"] == "healthy";
    health_status["checks"]["statement_store"] = store_status;

    if !healthy {
        health_status["status"] = json!("degraded");
    }

    Json(health_status)
}
