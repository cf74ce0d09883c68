//! Feed sorting options.

use serde::{Deserialize, Serialize};

/// How the public feed is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Newest first.
    #[default]
    Recent,
    /// Most liked first, newest breaking ties.
    Liked,
    /// Most commented first, newest breaking ties.
    Commented,
}

impl FeedSort {
    /// Parse the `sort` query parameter, defaulting to newest-first.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("liked") => Self::Liked,
            Some("commented") => Self::Commented,
            _ => Self::Recent,
        }
    }
}
