use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .nest("/users", user_routes())
        .nest("/auth", auth_routes())
        .nest("/bank", bank_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/me", get(read_current_user).delete(delete_current_user))
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/access-token", post(issue_access_token))
}

fn bank_routes() -> Router<AppState> {
    Router::new()
        .route("/process_bank_statement", post(process_bank_statement))
        .route("/get_bank_statements", get(get_bank_statements))
}
