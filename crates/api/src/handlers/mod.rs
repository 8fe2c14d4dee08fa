//! HTTP request handlers, one module per resource.

pub mod analytics;
pub mod auth;
pub mod oauth;
pub mod project;
pub mod scene;
pub mod upload;
pub mod user;
