use anyhow::Context;
use sqlx::{error::ErrorKind, postgres::PgPoolOptions, PgPool};
use thiserror::Error;

#[cfg(test)]
pub mod memory;

/// Failure of a single write, classified by the constraint that rejected it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("check constraint violated")]
    CheckViolation,
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some(db_err.kind()),
            _ => None,
        };
        match kind {
            Some(ErrorKind::UniqueViolation) => StoreError::UniqueViolation,
            Some(ErrorKind::CheckViolation) => StoreError::CheckViolation,
            Some(ErrorKind::ForeignKeyViolation) => StoreError::ForeignKeyViolation,
            _ => StoreError::Database(err),
        }
    }
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")
}
