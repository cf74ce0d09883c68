//! Viewer-safe resource access shared by both share mechanisms.

pub mod accessor;

pub use accessor::{PostView, ResourceAccessor, ResourceView, SharedProfile, UserProfileView};
