use tracing::{debug, warn};

use crate::{
    auth::{
        password::PasswordDigest,
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::{ApiError, ApiResult},
};

/// Register a new user.
///
/// The username is checked up front, but two concurrent signups can both pass
/// that check; the loser then trips the unique constraint, which maps to the
/// same `DuplicateUsername`.
pub async fn create_user(
    users: &dyn UserStore,
    username: &str,
    password: &str,
    image_url: Option<String>,
    bio: Option<String>,
) -> ApiResult<User> {
    if users.find_by_username(username).await?.is_some() {
        debug!(username, "username taken (pre-check)");
        return Err(ApiError::DuplicateUsername);
    }

    let password_hash = PasswordDigest::from_plaintext(password)?;
    let user = users
        .insert(NewUser {
            username: username.to_string(),
            password_hash,
            image_url,
            bio,
        })
        .await
        .map_err(|e| {
            warn!(username, error = %e, "user insert rejected");
            ApiError::from(e)
        })?;
    Ok(user)
}

/// Check a username/password pair.
pub async fn verify_credentials(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> ApiResult<User> {
    let user = users
        .find_by_username(username)
        .await?
        .ok_or(ApiError::NotFound)?;
    if !user.password_hash.verify(password) {
        return Err(ApiError::BadPassword);
    }
    Ok(user)
}
