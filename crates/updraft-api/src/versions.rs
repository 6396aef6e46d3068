use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use updraft_core::policy::{self, UpdateDecision};
use updraft_core::record;
use updraft_types::api::{
    CheckResponse, HistoryEntry, HistoryResponse, LatestResponse, LatestVersionInfo,
    UpsertVersionRequest, UpsertVersionResponse,
};
use updraft_types::error::ValidationError;
use updraft_types::models::Platform;
use updraft_types::version::Version;

use crate::auth::AppState;
use crate::error::ApiError;

fn default_platform() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub current_version: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
}

/// GET /check — is there a newer release for this client, and must they
/// take it? Input is validated before the catalog is consulted.
pub async fn check(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let current: Version = query
        .current_version
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("current_version"))?
        .parse()?;
    let platform: Platform = query.platform.parse()?;

    let db = state.clone();
    let latest = tokio::task::spawn_blocking(move || db.db.get_active_latest(platform)).await??;

    let decision = policy::evaluate(current, latest.as_ref());
    Ok(Json(check_response(decision)))
}

fn check_response(decision: UpdateDecision) -> CheckResponse {
    match decision.latest {
        None => CheckResponse {
            has_update: false,
            message: Some("No versions available".to_string()),
            latest: None,
        },
        Some(rec) => CheckResponse {
            has_update: decision.has_update,
            message: None,
            latest: Some(LatestVersionInfo {
                latest_version: rec.version,
                version_code: rec.version_code,
                is_mandatory: decision.is_mandatory,
                min_supported_version: rec.min_supported_version,
                download_url: rec.download_url,
                changelog: rec.changelog,
                release_date: rec.release_date,
            }),
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default = "default_platform")]
    pub platform: String,
}

/// GET /latest — newest active record for the platform, 404 when the
/// catalog has none.
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let platform: Platform = query.platform.parse()?;

    let db = state.clone();
    let record = tokio::task::spawn_blocking(move || db.db.get_active_latest(platform))
        .await??
        .ok_or(ApiError::NotFound)?;

    Ok(Json(LatestResponse {
        version: record.version,
        version_code: record.version_code,
        platform: record.platform,
        release_date: record.release_date,
        download_url: record.download_url,
        changelog: record.changelog,
        is_mandatory: record.is_mandatory,
        min_supported_version: record.min_supported_version,
    }))
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// GET /history (admin) — full catalog for the platform, active or not,
/// newest first, with adoption counts. `total` ignores pagination.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let platform: Platform = query.platform.parse()?;
    let limit = query.limit.min(200);
    let offset = query.offset;

    let db = state.clone();
    let (rows, total) =
        tokio::task::spawn_blocking(move || db.db.list_versions(platform, limit, offset))
            .await??;

    let versions = rows
        .into_iter()
        .map(|row| HistoryEntry {
            version: row.version,
            version_code: row.version_code,
            platform: row.platform,
            release_date: row.release_date,
            is_active: row.is_active,
            is_mandatory: row.is_mandatory,
            download_url: row.download_url,
            update_count: row.update_count,
        })
        .collect();

    Ok(Json(HistoryResponse { versions, total }))
}

/// POST /version (admin) — atomic insert-or-update keyed on
/// `(version, platform)`.
pub async fn upsert(
    State(state): State<AppState>,
    Json(req): Json<UpsertVersionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_record = record::validate(&req)?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.upsert_version(&new_record)).await??;

    Ok(Json(UpsertVersionResponse {
        success: true,
        message: "Version created/updated successfully".to_string(),
    }))
}
