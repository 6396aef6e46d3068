use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{OptionalExtension, Row};
use tracing::warn;

use updraft_types::models::{NewUpdateEvent, NewVersionRecord, Platform, UpdateEvent, VersionRecord};

use crate::models::{HistoryRow, UserRow};
use crate::Database;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, is_admin) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, username, password_hash, is_admin],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, password, is_admin, created_at
                 FROM users WHERE username = ?1",
            )?;
            let row = stmt
                .query_row([username], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        is_admin: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    /// Batch display-name lookup for the activity feed. Unknown ids are
    /// simply absent from the map.
    pub fn display_names(&self, user_ids: &[String]) -> Result<HashMap<String, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT id, username FROM users WHERE id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;

            Ok(rows)
        })
    }

    // -- Version catalog --

    /// Newest active record matching the platform (a record tagged `all`
    /// matches any platform). "Newest" means highest `version_code`; ties
    /// are unspecified and resolved by whatever SQLite returns first.
    pub fn get_active_latest(&self, platform: Platform) -> Result<Option<VersionRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT version, version_code, platform, release_date, is_active,
                        is_mandatory, min_supported_version, download_url, changelog
                 FROM app_versions
                 WHERE platform IN (?1, 'all') AND is_active = 1
                 ORDER BY version_code DESC
                 LIMIT 1",
            )?;
            let row = stmt
                .query_row([platform.as_str()], map_version_row)
                .optional()?;
            Ok(row)
        })
    }

    /// Single atomic insert-or-update keyed on `(version, platform)`.
    /// Inserts start active; updates never touch `is_active`.
    pub fn upsert_version(&self, rec: &NewVersionRecord) -> Result<()> {
        let changelog = serde_json::to_string(&rec.changelog)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO app_versions
                    (version, version_code, platform, release_date, is_mandatory,
                     min_supported_version, download_url, changelog, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)
                 ON CONFLICT(version, platform) DO UPDATE SET
                    version_code = excluded.version_code,
                    release_date = excluded.release_date,
                    is_mandatory = excluded.is_mandatory,
                    min_supported_version = excluded.min_supported_version,
                    download_url = excluded.download_url,
                    changelog = excluded.changelog,
                    updated_at = datetime('now')",
                rusqlite::params![
                    rec.version,
                    rec.version_code,
                    rec.platform.as_str(),
                    rec.release_date,
                    rec.is_mandatory,
                    rec.min_supported_version,
                    rec.download_url,
                    changelog,
                ],
            )?;
            Ok(())
        })
    }

    /// Platform-matching catalog rows (active or not), newest first, with
    /// per-version adoption counts. Returns the page plus the total
    /// platform-matching count, which ignores pagination.
    pub fn list_versions(
        &self,
        platform: Platform,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<HistoryRow>, i64)> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT v.version, v.version_code, v.platform, v.release_date,
                        v.is_active, v.is_mandatory, v.download_url,
                        COUNT(DISTINCT l.user_id) AS update_count
                 FROM app_versions v
                 LEFT JOIN app_update_logs l ON l.to_version = v.version
                 WHERE v.platform IN (?1, 'all')
                 GROUP BY v.id
                 ORDER BY v.version_code DESC
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(
                    rusqlite::params![platform.as_str(), limit, offset],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, bool>(4)?,
                            row.get::<_, bool>(5)?,
                            row.get::<_, Option<String>>(6)?,
                            row.get::<_, i64>(7)?,
                        ))
                    },
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let versions = rows
                .into_iter()
                .map(
                    |(version, version_code, platform, release_date, is_active, is_mandatory, download_url, update_count)| {
                        HistoryRow {
                            version,
                            version_code,
                            platform: parse_platform(&platform),
                            release_date,
                            is_active,
                            is_mandatory,
                            download_url,
                            update_count,
                        }
                    },
                )
                .collect();

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM app_versions WHERE platform IN (?1, 'all')",
                [platform.as_str()],
                |row| row.get(0),
            )?;

            Ok((versions, total))
        })
    }

    // -- Update event log --

    /// Appends one event and returns the assigned id.
    pub fn insert_event(&self, event: &NewUpdateEvent) -> Result<i64> {
        let device_info = serde_json::to_string(&event.device_info)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO app_update_logs
                    (user_id, from_version, to_version, platform, update_type, device_info)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    event.user_id,
                    event.from_version,
                    event.to_version,
                    event.platform.as_str(),
                    event.update_type.as_str(),
                    device_info,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// The full append-only event log, oldest first. Rows that fail enum
    /// decoding (only possible through manual edits) are skipped with a
    /// warning rather than failing the whole read.
    pub fn list_all_events(&self) -> Result<Vec<UpdateEvent>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, from_version, to_version, platform,
                        update_type, device_info, created_at
                 FROM app_update_logs
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let events = rows
                .into_iter()
                .filter_map(
                    |(id, user_id, from_version, to_version, platform, update_type, device_info, created_at)| {
                        let platform = match platform.parse() {
                            Ok(p) => p,
                            Err(_) => {
                                warn!("Skipping event {}: corrupt platform '{}'", id, platform);
                                return None;
                            }
                        };
                        let update_type = match update_type.parse() {
                            Ok(t) => t,
                            Err(_) => {
                                warn!("Skipping event {}: corrupt update_type '{}'", id, update_type);
                                return None;
                            }
                        };
                        let device_info = serde_json::from_str(&device_info).unwrap_or_else(|e| {
                            warn!("Corrupt device_info on event {}: {}", id, e);
                            serde_json::json!({})
                        });
                        Some(UpdateEvent {
                            id,
                            user_id,
                            from_version,
                            to_version,
                            platform,
                            update_type,
                            device_info,
                            created_at,
                        })
                    },
                )
                .collect();

            Ok(events)
        })
    }

    /// Distinct users whose logged updates ever targeted `version`.
    pub fn count_updates_for_version(&self, version: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(DISTINCT user_id) FROM app_update_logs WHERE to_version = ?1",
                [version],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

fn map_version_row(row: &Row<'_>) -> rusqlite::Result<VersionRecord> {
    let platform: String = row.get(2)?;
    let changelog: Option<String> = row.get(8)?;
    Ok(VersionRecord {
        version: row.get(0)?,
        version_code: row.get(1)?,
        platform: parse_platform(&platform),
        release_date: row.get(3)?,
        is_active: row.get(4)?,
        is_mandatory: row.get(5)?,
        min_supported_version: row.get(6)?,
        download_url: row.get(7)?,
        changelog: parse_changelog(changelog.as_deref()),
    })
}

fn parse_platform(raw: &str) -> Platform {
    raw.parse().unwrap_or_else(|_| {
        warn!("Corrupt platform '{}' in catalog row, treating as 'all'", raw);
        Platform::All
    })
}

fn parse_changelog(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Failed to parse changelog JSON: {}", e);
        Vec::new()
    })
}
