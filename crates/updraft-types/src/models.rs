use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Catalog platform tag. `All` is a catalog-only wildcard: a record tagged
/// `all` matches every platform lookup, but clients never report `all` as
/// their own platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    All,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::All => "all",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "all" => Ok(Platform::All),
            other => Err(ValidationError::InvalidEnum {
                field: "platform",
                value: other.to_string(),
            }),
        }
    }
}

/// How a client applied an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Manual,
    Forced,
    Auto,
}

impl UpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Manual => "manual",
            UpdateType::Forced => "forced",
            UpdateType::Auto => "auto",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(UpdateType::Manual),
            "forced" => Ok(UpdateType::Forced),
            "auto" => Ok(UpdateType::Auto),
            other => Err(ValidationError::InvalidEnum {
                field: "update_type",
                value: other.to_string(),
            }),
        }
    }
}

/// A published app version. Identity is `(version, platform)`; records are
/// never deleted, only deactivated via `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,
    pub version_code: i64,
    pub platform: Platform,
    pub release_date: String,
    pub is_active: bool,
    pub is_mandatory: bool,
    pub min_supported_version: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Vec<String>,
}

/// A validated version record ready for the catalog upsert. `is_active` is
/// not part of this shape: inserts start active and updates leave the flag
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersionRecord {
    pub version: String,
    pub version_code: i64,
    pub platform: Platform,
    pub release_date: String,
    pub is_mandatory: bool,
    pub min_supported_version: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Vec<String>,
}

/// One completed client update, as stored in the append-only event log.
/// Timestamps are opaque strings compared lexicographically; SQLite's
/// `datetime('now')` format sorts correctly that way.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEvent {
    pub id: i64,
    pub user_id: String,
    pub from_version: Option<String>,
    pub to_version: String,
    pub platform: Platform,
    pub update_type: UpdateType,
    pub device_info: serde_json::Value,
    pub created_at: String,
}

/// A validated update event awaiting insertion. The store assigns the id
/// and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpdateEvent {
    pub user_id: String,
    pub from_version: Option<String>,
    pub to_version: String,
    pub platform: Platform,
    pub update_type: UpdateType,
    pub device_info: serde_json::Value,
}
