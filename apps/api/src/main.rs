mod auth;
mod config;
mod errors;
mod routes;
mod state;
mod tasks;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::service::{AuthService, MockAuthenticator};
use crate::auth::store::{is_authenticated, FileSessionStore, MemorySessionStore, SessionStore};
use crate::config::{Config, SessionBackend};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tasks::registry::{SimulatedRunner, TaskRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hireboard API v{}", env!("CARGO_PKG_VERSION"));

    // Session store: one record under `session_key`
    let store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::File => {
            let store =
                FileSessionStore::new(&config.session_store_path, config.session_key.clone());
            info!("Session store at {}", store.path().display());
            Arc::new(store)
        }
        SessionBackend::Memory => {
            info!("Session store in memory; sessions end on restart");
            Arc::new(MemorySessionStore::new())
        }
    };
    info!("Persisted session present: {}", is_authenticated(store.as_ref()));

    // Credentials are not verified against a backend; swap the authenticator to add one
    let auth = AuthService::new(
        store,
        Arc::new(MockAuthenticator),
        chrono::Duration::hours(config.session_ttl_hours),
    );
    auth.init();
    info!("Auth state: {:?}", auth.state());

    let tasks = TaskRegistry::new(
        Arc::new(SimulatedRunner {
            duration: Duration::from_millis(config.task_duration_ms),
        }),
        Duration::from_secs(config.task_retention_secs),
    );
    info!(
        "Task runner: simulated ({}ms), finished tasks kept {}s",
        config.task_duration_ms, config.task_retention_secs
    );

    // Build app state
    let state = AppState {
        auth: Arc::new(auth),
        tasks,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
