/**
 * Collaborator Identity Extraction
 *
 * Identity is pre-resolved by the deployment's auth layer and forwarded in
 * headers; this extractor reads it so every handler gets a typed identity.
 *
 * Headers:
 * - `x-collab-user-id`   (required)
 * - `x-collab-user-name` (optional, defaults to the user id)
 * - `x-collab-role`      (optional, defaults to editor)
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::backend::error::ApiError;
use crate::shared::collaborator::Role;
use crate::shared::error::CollabError;

pub const USER_ID_HEADER: &str = "x-collab-user-id";
pub const USER_NAME_HEADER: &str = "x-collab-user-name";
pub const ROLE_HEADER: &str = "x-collab-role";

/// Identity of the collaborator making a request
#[derive(Clone, Debug)]
pub struct CollaboratorIdentity {
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
}

impl<S> FromRequestParts<S> for CollaboratorIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| {
                tracing::warn!("[Identity] Missing {} header", USER_ID_HEADER);
                CollabError::invalid(format!("missing {} header", USER_ID_HEADER))
            })?
            .to_string();

        let user_name = header(USER_NAME_HEADER)
            .map(str::to_string)
            .unwrap_or_else(|| user_id.clone());

        let role = match header(ROLE_HEADER) {
            Some(value) => value.parse::<Role>().map_err(|_| {
                tracing::warn!("[Identity] Unrecognized role {:?}", value);
                CollabError::invalid(format!("unrecognized role: {}", value))
            })?,
            None => Role::Editor,
        };

        Ok(CollaboratorIdentity {
            user_id,
            user_name,
            role,
        })
    }
}
