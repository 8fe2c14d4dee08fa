//! Request middleware: authentication extractors.

pub mod auth;

pub use auth::{AdminUser, AuthUser};
