use updraft_types::api::LogUpdateRequest;
use updraft_types::error::ValidationError;
use updraft_types::models::{NewUpdateEvent, Platform, UpdateType};
use updraft_types::version::Version;

/// Validates and normalizes an update-event submission.
///
/// Check order: required fields, then version grammar, then enum membership.
/// Empty strings count as missing. `platform` must be a concrete client
/// platform, so the catalog wildcard `all` is rejected here.
pub fn validate(user_id: &str, req: &LogUpdateRequest) -> Result<NewUpdateEvent, ValidationError> {
    let to_version = required(&req.to_version, "to_version")?;
    let platform_raw = required(&req.platform, "platform")?;
    let update_type_raw = required(&req.update_type, "update_type")?;

    to_version.parse::<Version>()?;
    let from_version = match req.from_version.as_deref().filter(|s| !s.is_empty()) {
        Some(from) => {
            from.parse::<Version>()?;
            Some(from.to_string())
        }
        None => None,
    };

    let platform: Platform = platform_raw.parse()?;
    if platform == Platform::All {
        return Err(ValidationError::InvalidEnum {
            field: "platform",
            value: platform_raw.to_string(),
        });
    }
    let update_type: UpdateType = update_type_raw.parse()?;

    Ok(NewUpdateEvent {
        user_id: user_id.to_string(),
        from_version,
        to_version: to_version.to_string(),
        platform,
        update_type,
        device_info: req
            .device_info
            .clone()
            .unwrap_or_else(|| serde_json::json!({})),
    })
}

fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ValidationError> {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LogUpdateRequest {
        LogUpdateRequest {
            from_version: Some("1.0.0".to_string()),
            to_version: Some("1.1.0".to_string()),
            platform: Some("ios".to_string()),
            update_type: Some("manual".to_string()),
            device_info: Some(serde_json::json!({"model": "iPhone 15"})),
        }
    }

    #[test]
    fn test_valid_submission() {
        let event = validate("u1", &request()).unwrap();
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.to_version, "1.1.0");
        assert_eq!(event.platform, Platform::Ios);
        assert_eq!(event.update_type, UpdateType::Manual);
    }

    #[test]
    fn test_missing_fields() {
        let mut req = request();
        req.to_version = None;
        assert_eq!(
            validate("u1", &req),
            Err(ValidationError::MissingField("to_version"))
        );

        let mut req = request();
        req.platform = None;
        assert_eq!(
            validate("u1", &req),
            Err(ValidationError::MissingField("platform"))
        );

        // Empty string counts as missing.
        let mut req = request();
        req.update_type = Some(String::new());
        assert_eq!(
            validate("u1", &req),
            Err(ValidationError::MissingField("update_type"))
        );
    }

    #[test]
    fn test_bad_versions() {
        let mut req = request();
        req.to_version = Some("1.1".to_string());
        assert!(matches!(
            validate("u1", &req),
            Err(ValidationError::InvalidFormat(_))
        ));

        let mut req = request();
        req.from_version = Some("one.two.three".to_string());
        assert!(matches!(
            validate("u1", &req),
            Err(ValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_from_version_optional() {
        let mut req = request();
        req.from_version = None;
        assert_eq!(validate("u1", &req).unwrap().from_version, None);

        // Empty string is treated the same as absent.
        let mut req = request();
        req.from_version = Some(String::new());
        assert_eq!(validate("u1", &req).unwrap().from_version, None);
    }

    #[test]
    fn test_rejects_unknown_platform() {
        let mut req = request();
        req.platform = Some("web".to_string());
        assert_eq!(
            validate("u1", &req),
            Err(ValidationError::InvalidEnum {
                field: "platform",
                value: "web".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_wildcard_platform() {
        let mut req = request();
        req.platform = Some("all".to_string());
        assert!(matches!(
            validate("u1", &req),
            Err(ValidationError::InvalidEnum { field: "platform", .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_update_type() {
        let mut req = request();
        req.update_type = Some("silent".to_string());
        assert_eq!(
            validate("u1", &req),
            Err(ValidationError::InvalidEnum {
                field: "update_type",
                value: "silent".to_string()
            })
        );
    }

    #[test]
    fn test_device_info_defaults_to_empty_object() {
        let mut req = request();
        req.device_info = None;
        assert_eq!(
            validate("u1", &req).unwrap().device_info,
            serde_json::json!({})
        );
    }
}
