use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A user's choice of when the daily reminder goes out.
///
/// Keyed by email; the store guarantees at most one record per address
/// (writes are upserts). `notification_time` is a zero-padded 24h `HH:MM`
/// string in the service's configured timezone, compared verbatim against
/// the current minute by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreference {
    pub email: String,
    pub notification_time: String,
}

/// Input for setting (or replacing) a user's notification time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPreferenceInput {
    pub email: String,
    pub notification_time: String,
}

/// Parse a user-entered notification time and return its canonical
/// zero-padded `HH:MM` form, or `None` if it isn't a valid time of day.
///
/// Storing the canonical form is what makes the scheduler's exact string
/// comparison work for input like `9:05`.
pub fn normalize_notification_time(value: &str) -> Option<String> {
    let parsed = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
    Some(parsed.format("%H:%M").to_string())
}
