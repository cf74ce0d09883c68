//! Post domain entities.

pub mod model;

pub use model::{Comment, CreatePost, Like, Post, Reply};
