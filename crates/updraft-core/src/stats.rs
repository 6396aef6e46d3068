use std::collections::{BTreeMap, HashMap, HashSet};

use updraft_types::api::{LastUpdate, StatsResponse, VersionShare};
use updraft_types::models::UpdateEvent;

const ACTIVITY_FEED_LEN: usize = 10;

/// Reduces the raw update-event log to adoption statistics.
///
/// A user's "current version" is the target of their most recent event;
/// ties on `created_at` go to the higher event id. Percentages are shares of
/// all distinct users ever seen in the log, rounded to one decimal place.
/// `resolve_name` is the identity collaborator for the activity feed; a
/// `None` name is reported as null, never an error.
pub fn aggregate<F>(events: &[UpdateEvent], mut resolve_name: F) -> StatsResponse
where
    F: FnMut(&str) -> Option<String>,
{
    let total_users = events
        .iter()
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    // Latest event per user.
    let mut latest: HashMap<&str, &UpdateEvent> = HashMap::new();
    for event in events {
        latest
            .entry(event.user_id.as_str())
            .and_modify(|current| {
                if recency_key(event) > recency_key(current) {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    // One user per reduced event, so counting events counts users.
    let mut version_distribution: BTreeMap<String, VersionShare> = BTreeMap::new();
    for event in latest.values() {
        let share = version_distribution
            .entry(event.to_version.clone())
            .or_default();
        share.count += 1;
        *share.platforms.entry(event.platform).or_insert(0) += 1;
    }
    for share in version_distribution.values_mut() {
        share.percentage = if total_users == 0 {
            0.0
        } else {
            (share.count as f64 / total_users as f64 * 1000.0).round() / 10.0
        };
    }

    let mut recent: Vec<&UpdateEvent> = events.iter().collect();
    recent.sort_by(|a, b| recency_key(b).cmp(&recency_key(a)));
    let last_updates = recent
        .into_iter()
        .take(ACTIVITY_FEED_LEN)
        .map(|event| LastUpdate {
            user_id: event.user_id.clone(),
            user_name: resolve_name(&event.user_id),
            from_version: event.from_version.clone(),
            to_version: event.to_version.clone(),
            platform: event.platform,
            updated_at: event.created_at.clone(),
        })
        .collect();

    StatsResponse {
        total_users,
        version_distribution,
        last_updates,
    }
}

fn recency_key(event: &UpdateEvent) -> (&str, i64) {
    (event.created_at.as_str(), event.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use updraft_types::models::{Platform, UpdateType};

    fn event(id: i64, user: &str, to: &str, platform: Platform, at: &str) -> UpdateEvent {
        UpdateEvent {
            id,
            user_id: user.to_string(),
            from_version: None,
            to_version: to.to_string(),
            platform,
            update_type: UpdateType::Manual,
            device_info: serde_json::json!({}),
            created_at: at.to_string(),
        }
    }

    #[test]
    fn test_latest_per_user_reduction() {
        let events = vec![
            event(1, "u1", "1.0.0", Platform::Ios, "2026-08-01 10:00:00"),
            event(2, "u1", "1.1.0", Platform::Ios, "2026-08-02 10:00:00"),
            event(3, "u2", "1.0.0", Platform::Android, "2026-08-01 10:00:00"),
        ];

        let stats = aggregate(&events, |_| None);
        assert_eq!(stats.total_users, 2);

        let v110 = &stats.version_distribution["1.1.0"];
        assert_eq!(v110.count, 1);
        assert_eq!(v110.percentage, 50.0);
        assert_eq!(v110.platforms[&Platform::Ios], 1);

        let v100 = &stats.version_distribution["1.0.0"];
        assert_eq!(v100.count, 1);
        assert_eq!(v100.percentage, 50.0);
        assert_eq!(v100.platforms[&Platform::Android], 1);
    }

    #[test]
    fn test_timestamp_tie_goes_to_higher_id() {
        let events = vec![
            event(1, "u1", "1.0.0", Platform::Ios, "2026-08-01 10:00:00"),
            event(2, "u1", "1.1.0", Platform::Ios, "2026-08-01 10:00:00"),
        ];
        let stats = aggregate(&events, |_| None);
        assert!(stats.version_distribution.contains_key("1.1.0"));
        assert!(!stats.version_distribution.contains_key("1.0.0"));
    }

    #[test]
    fn test_platform_breakdown_sums_across_platforms() {
        let events = vec![
            event(1, "u1", "2.0.0", Platform::Ios, "2026-08-01 10:00:00"),
            event(2, "u2", "2.0.0", Platform::Android, "2026-08-01 11:00:00"),
            event(3, "u3", "2.0.0", Platform::Android, "2026-08-01 12:00:00"),
        ];
        let stats = aggregate(&events, |_| None);
        let share = &stats.version_distribution["2.0.0"];
        assert_eq!(share.count, 3);
        assert_eq!(share.percentage, 100.0);
        assert_eq!(share.platforms[&Platform::Ios], 1);
        assert_eq!(share.platforms[&Platform::Android], 2);
    }

    #[test]
    fn test_percentage_rounding() {
        let events = vec![
            event(1, "u1", "1.0.0", Platform::Ios, "t1"),
            event(2, "u2", "1.0.0", Platform::Ios, "t1"),
            event(3, "u3", "1.1.0", Platform::Ios, "t1"),
        ];
        let stats = aggregate(&events, |_| None);
        // 2/3 and 1/3, one decimal place.
        assert_eq!(stats.version_distribution["1.0.0"].percentage, 66.7);
        assert_eq!(stats.version_distribution["1.1.0"].percentage, 33.3);
    }

    #[test]
    fn test_empty_log() {
        let stats = aggregate(&[], |_| None);
        assert_eq!(stats.total_users, 0);
        assert!(stats.version_distribution.is_empty());
        assert!(stats.last_updates.is_empty());
    }

    #[test]
    fn test_activity_feed_newest_first_capped_at_ten() {
        let events: Vec<UpdateEvent> = (1..=15)
            .map(|i| {
                event(
                    i,
                    &format!("u{i}"),
                    "1.0.0",
                    Platform::Ios,
                    &format!("2026-08-01 10:00:{i:02}"),
                )
            })
            .collect();

        let stats = aggregate(&events, |uid| Some(format!("name-{uid}")));
        assert_eq!(stats.last_updates.len(), 10);
        assert_eq!(stats.last_updates[0].user_id, "u15");
        assert_eq!(stats.last_updates[9].user_id, "u6");
        assert_eq!(stats.last_updates[0].user_name.as_deref(), Some("name-u15"));
    }

    #[test]
    fn test_feed_uses_raw_events_not_reduced() {
        let events = vec![
            event(1, "u1", "1.0.0", Platform::Ios, "2026-08-01 10:00:00"),
            event(2, "u1", "1.1.0", Platform::Ios, "2026-08-02 10:00:00"),
        ];
        let stats = aggregate(&events, |_| None);
        assert_eq!(stats.last_updates.len(), 2);
    }

    #[test]
    fn test_idempotent_over_unchanged_log() {
        let events = vec![
            event(1, "u1", "1.0.0", Platform::Ios, "2026-08-01 10:00:00"),
            event(2, "u1", "1.1.0", Platform::Ios, "2026-08-02 10:00:00"),
            event(3, "u2", "1.0.0", Platform::Android, "2026-08-01 10:00:00"),
        ];
        let first = aggregate(&events, |_| Some("n".to_string()));
        let second = aggregate(&events, |_| Some("n".to_string()));
        assert_eq!(first, second);
    }
}
