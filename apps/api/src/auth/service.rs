//! Auth service. Owns the in-process identity and its single persisted record.
//!
//! Lifecycle: `Loading` → `init()` reads the store once → `Authenticated` /
//! `Unauthenticated`, then changes only on login, signup, logout or expiry.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::session::{AuthPhase, AuthState, Credentials, Registration, Session};
use crate::auth::store::{SessionStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("registration rejected: {0}")]
    RegistrationFailed(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("session write did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Verifies credentials and produces the identity to persist.
///
/// A real backend rejects with `AuthError::InvalidCredentials`; persistence is
/// done by `AuthService`, not here.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    async fn register(&self, registration: &Registration) -> Result<Session, AuthError>;
}

/// Accepts any well-formed credentials and fabricates an identity.
pub struct MockAuthenticator;

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let Some((local, _)) = credentials.email.split_once('@') else {
            return Err(AuthError::InvalidCredentials);
        };
        if local.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Session::new("user-123", local, credentials.email.clone()))
    }

    async fn register(&self, registration: &Registration) -> Result<Session, AuthError> {
        if registration.name.trim().is_empty() || registration.contact_number.is_empty() {
            return Err(AuthError::RegistrationFailed(
                "name and contact number are required".to_string(),
            ));
        }
        let id = format!("user-{}", Utc::now().timestamp_millis());
        Ok(Session::new(
            id,
            registration.name.clone(),
            registration.email.clone(),
        ))
    }
}

pub struct AuthService {
    store: Arc<dyn SessionStore>,
    authenticator: Arc<dyn Authenticator>,
    /// Guards both the phase and the store write so concurrent logins cannot interleave.
    /// Shared with the blocking pool, where store writes run.
    phase: Arc<Mutex<AuthPhase>>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        authenticator: Arc<dyn Authenticator>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            store,
            authenticator,
            phase: Arc::new(Mutex::new(AuthPhase::Loading)),
            session_ttl,
        }
    }

    /// Reads the persisted record once. Expired records are cleared.
    pub fn init(&self) {
        let mut phase = self.lock_phase();
        *phase = match self.store.get() {
            Some(session) if session.is_expired_at(Utc::now()) => {
                info!("Persisted session for {} has expired", session.email);
                self.clear_store();
                AuthPhase::Unauthenticated
            }
            Some(session) => {
                info!("Restored session for {}", session.email);
                AuthPhase::Authenticated(session)
            }
            None => AuthPhase::Unauthenticated,
        };
    }

    /// Current phase; an authenticated phase whose session has expired drops to
    /// `Unauthenticated` here.
    pub fn phase(&self) -> AuthPhase {
        let mut phase = self.lock_phase();
        if phase
            .session()
            .is_some_and(|s| s.is_expired_at(Utc::now()))
        {
            info!("Session expired; signing out");
            self.clear_store();
            *phase = AuthPhase::Unauthenticated;
        }
        phase.clone()
    }

    pub fn state(&self) -> AuthState {
        AuthState::from(&self.phase())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase(), AuthPhase::Authenticated(_))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.authenticator.authenticate(credentials).await?;
        self.establish(session, credentials.remember_me).await
    }

    pub async fn signup(&self, registration: &Registration) -> Result<Session, AuthError> {
        let session = self.authenticator.register(registration).await?;
        self.establish(session, registration.remember_me).await
    }

    /// Idempotent. A failed clear is logged; the in-process identity is dropped regardless.
    ///
    /// Blocks on the store; async callers run it on the blocking pool.
    pub fn logout(&self) {
        let mut phase = self.lock_phase();
        if let Some(session) = phase.session() {
            info!("Signing out {}", session.email);
        }
        self.clear_store();
        *phase = AuthPhase::Unauthenticated;
    }

    /// Persists `session` on the blocking pool, then makes it the current identity.
    async fn establish(&self, mut session: Session, remember_me: bool) -> Result<Session, AuthError> {
        session.expires_at = if remember_me {
            None
        } else {
            Some(Utc::now() + self.session_ttl)
        };

        let store = Arc::clone(&self.store);
        let phase = Arc::clone(&self.phase);
        let session = tokio::task::spawn_blocking(move || {
            let mut phase = lock(&phase);
            store.set(&session)?;
            *phase = AuthPhase::Authenticated(session.clone());
            Ok::<_, StoreError>(session)
        })
        .await??;

        info!(
            "Signed in {} (remember_me={remember_me})",
            session.email
        );
        Ok(session)
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session: {e}");
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, AuthPhase> {
        lock(&self.phase)
    }
}

fn lock(phase: &Mutex<AuthPhase>) -> MutexGuard<'_, AuthPhase> {
    phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
