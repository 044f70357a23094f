use sqlx::FromRow;

use crate::auth::password::PasswordDigest;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: PasswordDigest, // argon2, write-only
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Values for a user row that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: PasswordDigest,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}
