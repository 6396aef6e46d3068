use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            is_admin    INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS app_versions (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            version               TEXT NOT NULL,
            version_code          INTEGER NOT NULL,
            platform              TEXT NOT NULL,
            release_date          TEXT NOT NULL,
            is_active             INTEGER NOT NULL DEFAULT 1,
            is_mandatory          INTEGER NOT NULL DEFAULT 0,
            min_supported_version TEXT,
            download_url          TEXT,
            changelog             TEXT,
            created_at            TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at            TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(version, platform)
        );

        CREATE INDEX IF NOT EXISTS idx_versions_latest
            ON app_versions(platform, is_active, version_code);

        CREATE TABLE IF NOT EXISTS app_update_logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL,
            from_version TEXT,
            to_version  TEXT NOT NULL,
            platform    TEXT NOT NULL,
            update_type TEXT NOT NULL,
            device_info TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_update_logs_user
            ON app_update_logs(user_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_update_logs_version
            ON app_update_logs(to_version);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
