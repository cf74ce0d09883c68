//! Stateless encrypted-hash sharing.

pub mod codec;
pub mod service;

pub use codec::HashCodec;
pub use service::{IssuedHash, SecureShareService};
