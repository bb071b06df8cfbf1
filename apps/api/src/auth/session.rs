use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The persisted "someone is signed in" record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `None` means the session lives until logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            expires_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub password: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub remember_me: bool,
}

/// Forms send `null` for an untouched checkbox; treat it like an absent one.
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lifecycle of the in-process identity. Starts in `Loading` until the store is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl AuthPhase {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Derived view over `AuthPhase` handed to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<Session>,
}

impl From<&AuthPhase> for AuthState {
    fn from(phase: &AuthPhase) -> Self {
        AuthState {
            is_authenticated: matches!(phase, AuthPhase::Authenticated(_)),
            is_loading: matches!(phase, AuthPhase::Loading),
            user: phase.session().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_without_expiry_never_expires() {
        let s = Session::new("user-123", "jane", "jane@example.com");
        assert!(!s.is_expired_at(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let now = Utc::now();
        let mut s = Session::new("user-123", "jane", "jane@example.com");
        s.expires_at = Some(now);
        assert!(s.is_expired_at(now));
        assert!(!s.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_serialized_shape_matches_stored_record() {
        let s = Session::new("user-123", "jane", "jane@example.com");
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            serde_json::json!({ "id": "user-123", "name": "jane", "email": "jane@example.com" })
        );
    }

    #[test]
    fn test_auth_state_from_phase() {
        let loading = AuthState::from(&AuthPhase::Loading);
        assert!(loading.is_loading && !loading.is_authenticated);

        let s = Session::new("user-1", "a", "a@example.com");
        let authed = AuthState::from(&AuthPhase::Authenticated(s.clone()));
        assert!(authed.is_authenticated && !authed.is_loading);
        assert_eq!(authed.user, Some(s));

        let anon = AuthState::from(&AuthPhase::Unauthenticated);
        assert!(!anon.is_authenticated && !anon.is_loading && anon.user.is_none());
    }

    #[test]
    fn test_credentials_treat_null_remember_me_as_unchecked() {
        for body in [
            serde_json::json!({ "email": "a@example.com", "password": "x", "rememberMe": null }),
            serde_json::json!({ "email": "a@example.com", "password": "x" }),
        ] {
            let credentials: Credentials = serde_json::from_value(body).unwrap();
            assert!(!credentials.remember_me);
        }

        let checked: Credentials = serde_json::from_value(
            serde_json::json!({ "email": "a@example.com", "password": "x", "rememberMe": true }),
        )
        .unwrap();
        assert!(checked.remember_me);
    }
}
