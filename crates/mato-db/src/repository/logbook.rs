//! # Logbook Repository
//!
//! Append-mostly free-text operations log (incidents, reversals, cash
//! differences, stock received). Entries can be deleted; they are never
//! edited.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mato_core::LogEntry;

/// Repository for logbook database operations.
#[derive(Debug, Clone)]
pub struct LogbookRepository {
    pool: SqlitePool,
}

impl LogbookRepository {
    /// Creates a new LogbookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LogbookRepository { pool }
    }

    /// Appends an entry and returns it.
    pub async fn insert(&self, text: &str) -> DbResult<LogEntry> {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO logbook (id, text, created_at) VALUES (?1, ?2, ?3)")
            .bind(&entry.id)
            .bind(&entry.text)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await?;

        debug!(id = %entry.id, "Logbook entry added");
        Ok(entry)
    }

    /// Lists entries, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<LogEntry>> {
        let entries = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT id, text, created_at
            FROM logbook
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Deletes an entry by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM logbook WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Log entry", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
