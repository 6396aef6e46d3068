use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use updraft_core::{event, stats};
use updraft_types::api::{Claims, LogUpdateRequest, LogUpdateResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /log-update — append one completed update to the event log.
/// Validation happens before the insert so the log never holds malformed
/// rows.
pub async fn log_update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<LogUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_event = event::validate(&claims.sub.to_string(), &req)?;

    let db = state.clone();
    let log_id = tokio::task::spawn_blocking(move || db.db.insert_event(&new_event)).await??;

    Ok((
        StatusCode::CREATED,
        Json(LogUpdateResponse {
            success: true,
            message: "Update logged successfully".to_string(),
            log_id,
        }),
    ))
}

/// GET /stats (admin) — adoption distribution over the whole event log plus
/// the ten most recent updates, decorated with display names.
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let (events, names) = tokio::task::spawn_blocking(move || {
        let events = db.db.list_all_events()?;
        let user_ids: Vec<String> = events
            .iter()
            .map(|e| e.user_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names = db.db.display_names(&user_ids)?;
        Ok::<_, anyhow::Error>((events, names))
    })
    .await??;

    let stats = stats::aggregate(&events, |user_id| names.get(user_id).cloned());
    Ok(Json(stats))
}
