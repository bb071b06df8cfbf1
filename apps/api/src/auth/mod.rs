// Session gate: persisted single-slot session, auth service, and route gating.
// Credentials are never verified against a backend; see `Authenticator`.

pub mod gate;
pub mod handlers;
pub mod service;
pub mod session;
pub mod store;
