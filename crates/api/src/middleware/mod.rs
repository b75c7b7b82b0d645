//! Request middleware.

pub mod auth;

pub use auth::{AuthUser, require_auth};
