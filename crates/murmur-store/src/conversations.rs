use chrono::{DateTime, Utc};
use rusqlite::params;

use murmur_shared::{ConversationDocument, ConversationId, Message};

use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    /// Read the full conversation document.
    pub fn read_document(&self, id: ConversationId) -> Result<ConversationDocument> {
        self.conn()
            .query_row(
                "SELECT document, last_updated FROM conversations WHERE id = ?1",
                params![id.to_string()],
                row_to_document,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Replace the `document` and `last_updated` columns of the conversation
    /// row, creating it if it does not exist.  Columns this write does not
    /// name are preserved.
    pub fn put_document(&self, id: ConversationId, document: &ConversationDocument) -> Result<()> {
        let json = serde_json::to_string(&document.messages)?;
        self.conn().execute(
            "INSERT INTO conversations (id, document, last_updated) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET document = ?2, last_updated = ?3",
            params![
                id.to_string(),
                json,
                document.last_updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_document(&self, id: ConversationId) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM conversations WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationDocument> {
    let json: String = row.get(0)?;
    let ts_str: String = row.get(1)?;

    let messages: Vec<Message> = serde_json::from_str(&json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let last_updated: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ConversationDocument {
        messages,
        last_updated,
    })
}
