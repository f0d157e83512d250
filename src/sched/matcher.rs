use std::collections::HashMap;

use crate::models::UserPreference;

/// Emails whose configured notification time equals `now` (`HH:MM`).
///
/// Matching is exact string equality: a user set to `09:00` is due only
/// during the single minute the driver observes `09:00`; a missed minute
/// is never replayed. Duplicate records for one email (the file can be
/// edited out-of-band) collapse last-wins before the comparison, so a
/// stale earlier record can never trigger a send. Each email appears at
/// most once in the result, in first-appearance order.
pub fn due_users(preferences: &[UserPreference], now: &str) -> Vec<String> {
    let mut latest: HashMap<&str, &str> = HashMap::new();
    for pref in preferences {
        latest.insert(pref.email.as_str(), pref.notification_time.as_str());
    }

    let mut due = Vec::new();
    for pref in preferences {
        // remove() makes the first occurrence decide position and
        // subsequent occurrences no-ops.
        if latest.remove(pref.email.as_str()) == Some(now) {
            due.push(pref.email.clone());
        }
    }
    due
}
