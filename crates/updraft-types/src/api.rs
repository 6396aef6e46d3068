use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Platform;

// -- JWT Claims --

/// JWT claims shared by the REST middleware and the auth handlers. Canonical
/// definition lives here in updraft-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Update check --

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub has_update: bool,
    /// Set only when the catalog has no active version for the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub latest: Option<LatestVersionInfo>,
}

/// Fields copied verbatim from the winning catalog record, plus the derived
/// mandatory flag.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersionInfo {
    pub latest_version: String,
    pub version_code: i64,
    pub is_mandatory: bool,
    pub min_supported_version: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Vec<String>,
    pub release_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResponse {
    pub version: String,
    pub version_code: i64,
    pub platform: Platform,
    pub release_date: String,
    pub download_url: Option<String>,
    pub changelog: Vec<String>,
    pub is_mandatory: bool,
    pub min_supported_version: Option<String>,
}

// -- Update log --

/// Raw submission body. Required fields are modeled as `Option` so that
/// validation can report `MissingField` instead of a generic decode error.
#[derive(Debug, Default, Deserialize)]
pub struct LogUpdateRequest {
    pub from_version: Option<String>,
    pub to_version: Option<String>,
    pub platform: Option<String>,
    pub update_type: Option<String>,
    pub device_info: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct LogUpdateResponse {
    pub success: bool,
    pub message: String,
    pub log_id: i64,
}

// -- Version history --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub version: String,
    pub version_code: i64,
    pub platform: Platform,
    pub release_date: String,
    pub is_active: bool,
    pub is_mandatory: bool,
    pub download_url: Option<String>,
    /// Distinct users whose latest-logged update targeted this version string.
    pub update_count: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub versions: Vec<HistoryEntry>,
    pub total: i64,
}

// -- Catalog upsert --

#[derive(Debug, Default, Deserialize)]
pub struct UpsertVersionRequest {
    pub version: Option<String>,
    pub version_code: Option<i64>,
    pub platform: Option<String>,
    pub release_date: Option<String>,
    pub is_mandatory: Option<bool>,
    pub min_supported_version: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpsertVersionResponse {
    pub success: bool,
    pub message: String,
}

// -- Adoption stats --

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub version_distribution: BTreeMap<String, VersionShare>,
    pub last_updates: Vec<LastUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VersionShare {
    pub count: u64,
    /// Share of `total_users`, rounded to one decimal place. 0 when there
    /// are no users at all.
    pub percentage: f64,
    pub platforms: BTreeMap<Platform, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpdate {
    pub user_id: String,
    pub user_name: Option<String>,
    pub from_version: Option<String>,
    pub to_version: String,
    pub platform: Platform,
    pub updated_at: String,
}
