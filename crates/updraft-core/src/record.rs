use updraft_types::api::UpsertVersionRequest;
use updraft_types::error::ValidationError;
use updraft_types::models::{NewVersionRecord, Platform};
use updraft_types::version::Version;

/// Validates an admin catalog upsert. `version` must satisfy the strict
/// grammar since the whole comparison engine depends on it; `platform` may
/// be the wildcard `all` here. `min_supported_version` is passed through as
/// given — lookups parse it leniently.
pub fn validate(req: &UpsertVersionRequest) -> Result<NewVersionRecord, ValidationError> {
    let version = req
        .version
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("version"))?;
    let version_code = req
        .version_code
        .ok_or(ValidationError::MissingField("version_code"))?;
    let platform_raw = req
        .platform
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("platform"))?;
    let release_date = req
        .release_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("release_date"))?;

    version.parse::<Version>()?;
    let platform: Platform = platform_raw.parse()?;

    Ok(NewVersionRecord {
        version: version.to_string(),
        version_code,
        platform,
        release_date: release_date.to_string(),
        is_mandatory: req.is_mandatory.unwrap_or(false),
        min_supported_version: req.min_supported_version.clone(),
        download_url: req.download_url.clone(),
        changelog: req.changelog.clone().unwrap_or_default(),
    })
}
