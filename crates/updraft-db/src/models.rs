use updraft_types::models::Platform;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// One catalog row in the admin history listing, annotated with the number
/// of distinct users whose logged updates targeted this version string.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub version: String,
    pub version_code: i64,
    pub platform: Platform,
    pub release_date: String,
    pub is_active: bool,
    pub is_mandatory: bool,
    pub download_url: Option<String>,
    pub update_count: i64,
}
