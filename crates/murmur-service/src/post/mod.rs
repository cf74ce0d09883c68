//! Post operations — creation, feed, likes, comments, and replies.

pub mod service;

pub use service::PostService;
