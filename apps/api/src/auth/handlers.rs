//! Axum route handlers for the Auth and Route-gate APIs.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::auth::gate::{resolve, return_path, GateDecision};
use crate::auth::session::{AuthState, Credentials, Registration, Session};
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::engine::FormSchema;
use crate::validation::schemas::{SIGN_IN, SIGN_UP};
use crate::validation::{validate, FormValues};

const LOGIN_FAILED: &str = "Invalid email or password. Please try again.";
const SIGNUP_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Session,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
    pub from: Option<String>,
}

/// Runs the form schema, then decodes the submission. `from` is the location
/// recorded by the gate before the visitor was sent to sign-in.
fn accept_form<T: DeserializeOwned>(
    schema: &FormSchema,
    values: FormValues,
) -> Result<(T, Option<String>), AppError> {
    let errors = validate(schema, &values);
    if !errors.is_valid() {
        return Err(AppError::InvalidForm(errors));
    }

    let from = values
        .get("from")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let form = serde_json::from_value(Value::Object(values))
        .map_err(|e| AppError::Validation(format!("Malformed {} form: {e}", schema.name)))?;
    Ok((form, from))
}

/// GET /api/v1/auth/session
pub async fn handle_session(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.auth.state())
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(values): Json<FormValues>,
) -> Result<Json<AuthResponse>, AppError> {
    let (credentials, from): (Credentials, _) = accept_form(&SIGN_IN, values)?;

    let user = state.auth.login(&credentials).await.map_err(|e| {
        warn!("Login failed for {}: {e}", credentials.email);
        AppError::AuthFailed(LOGIN_FAILED.to_string())
    })?;

    Ok(Json(AuthResponse {
        user,
        redirect_to: return_path(from.as_deref()),
    }))
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(values): Json<FormValues>,
) -> Result<Json<AuthResponse>, AppError> {
    let (registration, from): (Registration, _) = accept_form(&SIGN_UP, values)?;

    let user = state.auth.signup(&registration).await.map_err(|e| {
        warn!("Signup failed for {}: {e}", registration.email);
        AppError::AuthFailed(SIGNUP_FAILED.to_string())
    })?;

    Ok(Json(AuthResponse {
        user,
        redirect_to: return_path(from.as_deref()),
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let auth = Arc::clone(&state.auth);
    tokio::task::spawn_blocking(move || auth.logout())
        .await
        .map_err(|e| AppError::Internal(format!("Logout did not complete: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/routes/resolve?path=...&from=...
pub async fn handle_resolve_route(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Json<GateDecision> {
    let phase = state.auth.phase();
    Json(resolve(&phase, &query.path, query.from.as_deref()))
}
