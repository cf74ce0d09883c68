//! Token-based sharing — create, resolve, revoke, and list share links.

pub mod link;
pub mod service;

pub use link::LinkService;
pub use service::{CreateShareRequest, CreatedShare, ShareService, SharedResource};
