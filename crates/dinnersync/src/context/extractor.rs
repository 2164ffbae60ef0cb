//! Axum extractor for the authenticated user.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use uuid::Uuid;

use super::USER_ID_HEADER;

/// The requesting user's resolved identity.
///
/// Absence of identity is a hard failure (401) for every operation that
/// uses this extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

fn extract_user_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_user_id(&parts.headers).map(CurrentUser).ok_or((
            StatusCode::UNAUTHORIZED,
            format!("Missing or invalid {USER_ID_HEADER} header"),
        ))
    }
}
