//! User operations — signup, login, profiles, and follows.

pub mod service;

pub use service::{AuthenticatedUser, FollowChange, ProfileWithPosts, UserService};
