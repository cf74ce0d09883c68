//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` implementation lives in `murmur-core` alongside the
//! `AppError` type it maps (Rust's orphan rule requires the impl to reside
//! in the crate that owns either the trait or the type). This module
//! re-exports the API error response body for convenience.

pub use murmur_core::error::ApiErrorResponse;
