//! Acting-principal extraction.
//!
//! The authenticating gateway in front of this service identifies the caller
//! via `X-Actor-Id` (UUID) and `X-Actor-Role` headers. Privileged operations
//! (reopen, force close, admin override) check the role here rather than
//! trusting any client-supplied boolean.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use iafa_shared::types::ActorId;
use iafa_shared::AppError;

use crate::response::ApiError;

/// The caller's capability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// May override period locks, force close, and reopen periods.
    Admin,
    /// Ordinary data entry.
    Operator,
}

/// The authenticated principal performing a request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    /// Principal ID.
    pub id: ActorId,
    /// Capability level.
    pub role: ActorRole,
}

impl Actor {
    /// Returns true if the actor carries the admin capability.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-actor-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(AppError::Validation(
                    "X-Actor-Id header is required".to_string(),
                ))
            })?
            .parse::<ActorId>()
            .map_err(|_| {
                ApiError(AppError::Validation(
                    "X-Actor-Id must be a UUID".to_string(),
                ))
            })?;

        let role = match parts
            .headers
            .get("x-actor-role")
            .and_then(|value| value.to_str().ok())
        {
            Some("admin") => ActorRole::Admin,
            Some("operator") | None => ActorRole::Operator,
            Some(other) => {
                return Err(ApiError(AppError::Validation(format!(
                    "unknown X-Actor-Role '{other}'"
                ))));
            }
        };

        Ok(Self { id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<Actor, ApiError> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_actor_id_is_rejected() {
        assert!(extract(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_role_defaults_to_operator() {
        let actor = extract(&[("x-actor-id", "0198c5e5-7a2b-7c3d-9e4f-5a6b7c8d9e0f")])
            .await
            .unwrap();
        assert_eq!(actor.role, ActorRole::Operator);
        assert!(!actor.is_admin());
    }

    #[tokio::test]
    async fn test_admin_role_is_recognized() {
        let actor = extract(&[
            ("x-actor-id", "0198c5e5-7a2b-7c3d-9e4f-5a6b7c8d9e0f"),
            ("x-actor-role", "admin"),
        ])
        .await
        .unwrap();
        assert!(actor.is_admin());
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let result = extract(&[
            ("x-actor-id", "0198c5e5-7a2b-7c3d-9e4f-5a6b7c8d9e0f"),
            ("x-actor-role", "superuser"),
        ])
        .await;
        assert!(result.is_err());
    }
}
