//! Request extractors.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use orbis_shared::types::UserId;
use serde_json::json;

/// Header naming the user acting on the system.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user, taken from the optional `X-User-Id` header.
///
/// Authentication happens in front of this service; the header is trusted
/// as-is and only recorded on created documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActingUser(pub Option<UserId>);

impl ActingUser {
    /// Returns the user ID, if the header was present.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        self.0
    }
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<UserId>().ok())
            .map(|id| Self(Some(id)))
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "VALIDATION_ERROR",
                        "message": "X-User-Id must be a UUID"
                    })),
                )
            })
    }
}
