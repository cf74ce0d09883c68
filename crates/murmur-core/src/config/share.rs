//! Content-sharing configuration.

use serde::{Deserialize, Serialize};

/// Settings for both share mechanisms (token links and encrypted hashes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base URL of the frontend, used to build shareable links.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Default share-token lifetime in days when the creator gives none.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: i64,
    /// Number of recent posts embedded in a shared user profile.
    #[serde(default = "default_profile_posts")]
    pub profile_posts_limit: i64,
    /// Process-wide secret for the encrypted-hash codec. The 256-bit
    /// cipher key is derived from this string at startup.
    #[serde(default = "default_hash_secret")]
    pub hash_secret: String,
    /// Interval in seconds between sweeps that purge long-expired tokens.
    /// `0` disables the sweep; lazy expiry at resolve time still applies.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            frontend_url: default_frontend_url(),
            default_expiry_days: default_expiry_days(),
            profile_posts_limit: default_profile_posts(),
            hash_secret: default_hash_secret(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_expiry_days() -> i64 {
    30
}

fn default_profile_posts() -> i64 {
    10
}

fn default_hash_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_MIN_32_CHARS".to_string()
}

fn default_sweep_interval() -> u64 {
    3600
}
