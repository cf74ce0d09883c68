//! Share domain entities.

pub mod model;
pub mod payload;

pub use model::{NewShareToken, ResourceType, ShareToken};
pub use payload::SharePayload;
