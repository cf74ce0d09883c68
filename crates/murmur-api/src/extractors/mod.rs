//! Axum extractors.

pub mod auth;
pub mod client_meta;

pub use auth::AuthUser;
pub use client_meta::ClientMeta;
