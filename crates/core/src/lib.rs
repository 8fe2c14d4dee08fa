//! Shared domain types, errors, and pure helpers for the drawstory backend.
//!
//! This crate has no I/O: everything here is usable from the repository
//! layer, the HTTP layer, and tests without pulling in sqlx or axum.

pub mod error;
pub mod storage;
pub mod types;
pub mod validate;
