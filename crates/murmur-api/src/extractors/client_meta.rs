//! `ClientMeta` extractor — viewer IP and user agent for the share
//! audit trail. Works on unauthenticated requests.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use murmur_core::error::AppError;

/// Viewer metadata recorded against share token accesses.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    /// Request origin IP as reported by the proxy chain.
    pub ip_address: String,
    /// User-Agent header value, if sent.
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .unwrap_or("unknown")
            .trim()
            .to_string();

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Self {
            ip_address,
            user_agent,
        })
    }
}
