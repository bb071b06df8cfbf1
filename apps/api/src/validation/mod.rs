// Form validation: rule engine, built-in dashboard schemas, and field helpers.

pub mod engine;
pub mod handlers;
pub mod media;
pub mod phone;
pub mod schemas;

pub use engine::{validate, FormValues, ValidationResult};
