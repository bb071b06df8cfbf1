use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::tasks::registry::TaskRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single-slot session; swap the store or authenticator at startup.
    pub auth: Arc<AuthService>,
    pub tasks: TaskRegistry,
}

#[cfg(test)]
pub fn test_state() -> AppState {
    use std::time::Duration;

    use crate::auth::service::MockAuthenticator;
    use crate::auth::store::MemorySessionStore;
    use crate::config::Config;
    use crate::tasks::registry::SimulatedRunner;

    let config = Config::default();
    let auth = AuthService::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(MockAuthenticator),
        chrono::Duration::hours(config.session_ttl_hours),
    );
    auth.init();

    AppState {
        tasks: TaskRegistry::new(
            Arc::new(SimulatedRunner {
                duration: Duration::from_millis(config.task_duration_ms),
            }),
            Duration::from_secs(config.task_retention_secs),
        ),
        auth: Arc::new(auth),
    }
}
