use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// A user profile record created at sign-up.
///
/// Credentials live with the external account service; only the public
/// profile is stored here, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Account UUID.
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Free-form status line, "Available" for fresh accounts.
    pub about: String,
    pub created_at: DateTime<Utc>,
}

impl Database {
    pub fn insert_user(&self, user: &UserProfile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (email, id, name, about, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.email,
                user.id.to_string(),
                user.name,
                user.about,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, email: &str) -> Result<UserProfile> {
        self.conn()
            .query_row(
                "SELECT email, id, name, about, created_at FROM users WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    pub fn user_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserProfile> {
    let email: String = row.get(0)?;
    let id_str: String = row.get(1)?;
    let name: String = row.get(2)?;
    let about: String = row.get(3)?;
    let created_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(UserProfile {
        id,
        email,
        name,
        about,
        created_at,
    })
}
