use updraft_types::models::VersionRecord;
use updraft_types::version::Version;

/// Outcome of an update check against the newest active catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDecision {
    pub has_update: bool,
    pub is_mandatory: bool,
    /// The record the decision was made against. `None` when the catalog has
    /// no active version for the requested platform; both flags are then
    /// false.
    pub latest: Option<VersionRecord>,
}

/// Decides availability and mandatoriness for a client on `current`.
///
/// Callers must parse the client's version string *before* fetching
/// `latest`, so malformed input is rejected without touching the store.
///
/// An update is mandatory when the record carries the explicit admin flag,
/// or when the client sits below the record's minimum supported version.
/// The floor is parsed leniently (missing components read as 0); an
/// unparseable floor is ignored rather than treated as a constraint.
pub fn evaluate(current: Version, latest: Option<&VersionRecord>) -> UpdateDecision {
    let Some(record) = latest else {
        return UpdateDecision {
            has_update: false,
            is_mandatory: false,
            latest: None,
        };
    };

    // Upsert validation guarantees the stored version parses; if a hand
    // edited row doesn't, report no update rather than failing the check.
    let has_update = match record.version.parse::<Version>() {
        Ok(latest_version) => current < latest_version,
        Err(_) => false,
    };

    let below_floor = record
        .min_supported_version
        .as_deref()
        .and_then(Version::parse_padded)
        .is_some_and(|floor| current < floor);

    UpdateDecision {
        has_update,
        is_mandatory: record.is_mandatory || below_floor,
        latest: Some(record.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use updraft_types::models::Platform;

    fn record(version: &str) -> VersionRecord {
        VersionRecord {
            version: version.to_string(),
            version_code: 42,
            platform: Platform::All,
            release_date: "2026-08-01".to_string(),
            is_active: true,
            is_mandatory: false,
            min_supported_version: None,
            download_url: Some("https://example.com/app".to_string()),
            changelog: vec!["Bug fixes".to_string()],
        }
    }

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_catalog() {
        let decision = evaluate(v("1.0.0"), None);
        assert!(!decision.has_update);
        assert!(!decision.is_mandatory);
        assert!(decision.latest.is_none());
    }

    #[test]
    fn test_has_update() {
        let rec = record("1.2.3");
        assert!(!evaluate(v("1.2.3"), Some(&rec)).has_update);
        assert!(evaluate(v("1.2.2"), Some(&rec)).has_update);
        // Client ahead of the catalog is not an update.
        assert!(!evaluate(v("1.3.0"), Some(&rec)).has_update);
    }

    #[test]
    fn test_mandatory_flag_wins_regardless_of_version() {
        let mut rec = record("1.2.3");
        rec.is_mandatory = true;
        assert!(evaluate(v("1.2.3"), Some(&rec)).is_mandatory);
        assert!(evaluate(v("9.9.9"), Some(&rec)).is_mandatory);
    }

    #[test]
    fn test_mandatory_from_min_supported() {
        let mut rec = record("2.1.0");
        rec.min_supported_version = Some("2.0.0".to_string());
        assert!(evaluate(v("1.9.9"), Some(&rec)).is_mandatory);
        assert!(!evaluate(v("2.0.0"), Some(&rec)).is_mandatory);
    }

    #[test]
    fn test_min_supported_padded() {
        let mut rec = record("2.1.0");
        rec.min_supported_version = Some("2.0".to_string());
        assert!(evaluate(v("1.9.9"), Some(&rec)).is_mandatory);
        assert!(!evaluate(v("2.0.0"), Some(&rec)).is_mandatory);
    }

    #[test]
    fn test_unparseable_min_supported_ignored() {
        let mut rec = record("2.1.0");
        rec.min_supported_version = Some("latest".to_string());
        assert!(!evaluate(v("0.0.1"), Some(&rec)).is_mandatory);
    }

    #[test]
    fn test_decision_carries_record_fields() {
        let rec = record("1.2.3");
        let decision = evaluate(v("1.0.0"), Some(&rec));
        let latest = decision.latest.unwrap();
        assert_eq!(latest.version, "1.2.3");
        assert_eq!(latest.version_code, 42);
        assert_eq!(latest.download_url.as_deref(), Some("https://example.com/app"));
    }
}
