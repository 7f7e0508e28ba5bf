//! # Logbook Handlers
//!
//! Free-text operations log: incidents, reversals, cash differences,
//! stock received. Appending an entry also pushes it to Telegram when a
//! notifier is configured; the push is fire-and-forget and its failures
//! never reach the API response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use mato_core::{validation, LogEntry};

use crate::error::ApiResult;
use crate::state::AppState;

/// How many entries the screen shows.
const LOGBOOK_PAGE: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct LogEntryRequest {
    pub text: String,
}

/// GET /api/logbook - entries, newest first.
pub async fn list_entries(State(state): State<AppState>) -> ApiResult<Json<Vec<LogEntry>>> {
    let entries = state.db.logbook().list(LOGBOOK_PAGE).await?;
    Ok(Json(entries))
}

/// POST /api/logbook - append an entry (and notify, best-effort).
pub async fn add_entry(
    State(state): State<AppState>,
    Json(req): Json<LogEntryRequest>,
) -> ApiResult<Json<LogEntry>> {
    let text = validation::validate_log_text(&req.text)?;

    let entry = state.db.logbook().insert(&text).await?;

    if let Some(notifier) = &state.notifier {
        notifier.notify(format!("Logbook: {}", entry.text));
    }

    Ok(Json(entry))
}

/// DELETE /api/logbook/:id
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.logbook().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use mato_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, None)
    }

    #[tokio::test]
    async fn test_add_list_delete() {
        let state = test_state().await;

        let Json(entry) = add_entry(
            State(state.clone()),
            Json(LogEntryRequest {
                text: " Drawer short $2.00 ".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(entry.text, "Drawer short $2.00");

        let Json(entries) = list_entries(State(state.clone())).await.unwrap();
        assert_eq!(entries.len(), 1);

        delete_entry(State(state.clone()), Path(entry.id)).await.unwrap();
        let Json(entries) = list_entries(State(state)).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let state = test_state().await;

        let err = add_entry(
            State(state),
            Json(LogEntryRequest {
                text: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_404() {
        let state = test_state().await;

        let err = delete_entry(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
