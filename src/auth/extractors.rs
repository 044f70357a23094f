use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{error, warn};

use super::{repo_types::User, session::Session};
use crate::{error::ApiError, state::AppState};

/// The logged-in user, loaded from the session cookie.
///
/// Rejects with 401 when there is no valid session or when the session points
/// at a user that no longer exists.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        let user_id = session.current_user_id().ok_or(ApiError::Unauthorized)?;

        match state.users.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(user_id, "session refers to a missing user");
                Err(ApiError::Unauthorized)
            }
            Err(e) => {
                error!(error = %e, user_id, "load session user failed");
                Err(ApiError::Internal(e))
            }
        }
    }
}
