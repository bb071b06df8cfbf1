//! Route gate: decides whether a dashboard route renders or redirects (or waits).
//!
//! Protected routes send unauthenticated visitors to sign-in and remember where
//! they were going. Public-only routes (sign-in, sign-up) send authenticated
//! visitors back to that remembered location, or to the dashboard.

use serde::Serialize;

use crate::auth::session::AuthPhase;

pub const SIGN_IN_PATH: &str = "/signin";
pub const SIGN_UP_PATH: &str = "/signup";
pub const DEFAULT_LANDING: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    PublicOnly,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    SignIn,
    SignUp,
    Dashboard,
    Candidates,
    Jobs,
    CreateJob,
    CreateJobPosting,
    ResumeScreening,
    SkillMatching,
    Schedule,
    Team,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub access: Access,
    pub view: View,
}

const fn route(path: &'static str, access: Access, view: View) -> RouteDef {
    RouteDef { path, access, view }
}

pub const ROUTES: &[RouteDef] = &[
    route(SIGN_IN_PATH, Access::PublicOnly, View::SignIn),
    route(SIGN_UP_PATH, Access::PublicOnly, View::SignUp),
    route("/", Access::Protected, View::Dashboard),
    route("/candidates", Access::Protected, View::Candidates),
    route("/jobs", Access::Protected, View::Jobs),
    route("/jobs/create", Access::Protected, View::CreateJob),
    route("/create-job", Access::Protected, View::CreateJobPosting),
    route("/resume-screening", Access::Protected, View::ResumeScreening),
    route("/skill-matching", Access::Protected, View::SkillMatching),
    route("/schedule", Access::Protected, View::Schedule),
    route("/team", Access::Protected, View::Team),
    route("/settings", Access::Protected, View::Settings),
    // Placeholders until these screens exist; they show the dashboard.
    route("/analytics", Access::Protected, View::Dashboard),
    route("/interviews", Access::Protected, View::Dashboard),
    route("/ai-assistant", Access::Protected, View::Dashboard),
    route("/messages", Access::Protected, View::Dashboard),
    route("/reports", Access::Protected, View::Dashboard),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Session still loading; show neither variant.
    Placeholder,
    Render { view: View },
    Redirect { to: String, from: Option<String> },
}

/// Exact match on the path component; a trailing slash is ignored.
pub fn match_route(location: &str) -> Option<&'static RouteDef> {
    let path = path_of(location);
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    ROUTES.iter().find(|r| r.path == path)
}

fn path_of(location: &str) -> &str {
    location
        .split(['?', '#'])
        .next()
        .unwrap_or(location)
}

/// Where to land after sign-in. Only local, non-auth paths are honored.
pub fn return_path(from: Option<&str>) -> String {
    match from {
        Some(path)
            if is_local_path(path)
                && !matches!(
                    match_route(path).map(|r| r.access),
                    Some(Access::PublicOnly)
                ) =>
        {
            path.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}

/// A single leading slash and no backslashes or control characters. Browsers
/// read `\` as `/`, so `/\host` would leave the site.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

pub fn protected_gate(phase: &AuthPhase, location: &str, view: View) -> GateDecision {
    match phase {
        AuthPhase::Loading => GateDecision::Placeholder,
        AuthPhase::Authenticated(_) => GateDecision::Render { view },
        AuthPhase::Unauthenticated => GateDecision::Redirect {
            to: SIGN_IN_PATH.to_string(),
            from: Some(location.to_string()),
        },
    }
}

pub fn public_only_gate(phase: &AuthPhase, from: Option<&str>, view: View) -> GateDecision {
    match phase {
        AuthPhase::Loading => GateDecision::Placeholder,
        AuthPhase::Authenticated(_) => GateDecision::Redirect {
            to: return_path(from),
            from: None,
        },
        AuthPhase::Unauthenticated => GateDecision::Render { view },
    }
}

/// Resolves a requested location. Unknown paths go to sign-in.
pub fn resolve(phase: &AuthPhase, location: &str, from: Option<&str>) -> GateDecision {
    match match_route(location) {
        Some(route) => match route.access {
            Access::Protected => protected_gate(phase, location, route.view),
            Access::PublicOnly => public_only_gate(phase, from, route.view),
        },
        None => GateDecision::Redirect {
            to: SIGN_IN_PATH.to_string(),
            from: None,
        },
    }
}
