pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::state::AppState;
use crate::tasks::handlers as tasks;
use crate::validation::handlers as validation;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Validation API
        .route(
            "/api/v1/validate/profile-picture",
            post(validation::handle_validate_profile_picture),
        )
        .route("/api/v1/validate/:form", post(validation::handle_validate))
        .route("/api/v1/phone/format", get(validation::handle_format_phone))
        // Auth API
        .route("/api/v1/auth/session", get(auth::handle_session))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/routes/resolve", get(auth::handle_resolve_route))
        // Task API
        .route("/api/v1/tasks", post(tasks::handle_start_task))
        .route(
            "/api/v1/tasks/:id",
            get(tasks::handle_get_task).delete(tasks::handle_cancel_task),
        )
        .with_state(state)
}
