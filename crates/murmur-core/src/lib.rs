//! # murmur-core
//!
//! Core crate for the Murmur social platform. Contains configuration
//! schemas, shared types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Murmur crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
