use rusqlite::{ErrorCode, OptionalExtension};
use serde::Serialize;

use crate::db::Db;
use crate::error::ServiceError;

/// A stored account. Only the service sees the hash; [`UserIdentity`] is what
/// leaves the process.
#[derive(Debug, Clone)]
pub struct UserCredential {
    pub id: i64,
    pub username: String,
    pub secret_hash: String,
    pub created_at: String,
}

impl UserCredential {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
}

pub trait UserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>, ServiceError>;

    /// Inserts a new account and returns the stored row. A duplicate username
    /// must surface as [`ServiceError::Conflict`].
    fn insert_user(&self, username: &str, secret_hash: &str) -> Result<UserCredential, ServiceError>;
}

fn credential_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserCredential> {
    Ok(UserCredential {
        id: row.get(0)?,
        username: row.get(1)?,
        secret_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl UserStore for Db {
    fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>, ServiceError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
                [username],
                credential_from_row,
            )
            .optional()
        })
    }

    fn insert_user(&self, username: &str, secret_hash: &str) -> Result<UserCredential, ServiceError> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let inserted = self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO users(username, password_hash, created_at) VALUES(?, ?, ?)
                 RETURNING id, username, password_hash, created_at",
                (username, secret_hash, &created_at),
                credential_from_row,
            )
        });
        match inserted {
            Err(ServiceError::Store(rusqlite::Error::SqliteFailure(e, _)))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(ServiceError::Conflict("Username already exists".into()))
            }
            other => other,
        }
    }
}
