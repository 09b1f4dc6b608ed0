//! Countdown to an event start

use chrono::{DateTime, Utc};
use serde::Serialize;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Time remaining until a target instant.
///
/// Always derived from the wall clock, so a late or skipped tick is
/// corrected by the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
    /// "1d : 02h : 03m : 04s", empty once expired
    pub label: String,
}

impl Countdown {
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = (target - now).num_milliseconds();

        if diff <= 0 {
            return Self::expired();
        }

        let days = diff / DAY_MS;
        let hours = (diff % DAY_MS) / HOUR_MS;
        let minutes = (diff % HOUR_MS) / MINUTE_MS;
        let seconds = (diff % MINUTE_MS) / SECOND_MS;

        let mut parts = Vec::with_capacity(4);
        if days > 0 {
            parts.push(format!("{}d", days));
        }
        parts.push(format!("{:02}h", hours));
        parts.push(format!("{:02}m", minutes));
        parts.push(format!("{:02}s", seconds));

        Self {
            days,
            hours,
            minutes,
            seconds,
            is_expired: false,
            label: parts.join(" : "),
        }
    }

    pub fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
            label: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_countdown_with_days() {
        let now = at("2026-03-25T10:00:00Z");
        let target = now + Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        let c = Countdown::until(target, now);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (2, 3, 4, 5));
        assert!(!c.is_expired);
        assert_eq!(c.label, "2d : 03h : 04m : 05s");
    }

    #[test]
    fn test_countdown_under_a_day_omits_days() {
        let now = at("2026-03-25T10:00:00Z");
        let c = Countdown::until(now + Duration::seconds(61), now);
        assert_eq!(c.label, "00h : 01m : 01s");
    }

    #[test]
    fn test_sub_second_remainder_truncates() {
        let now = at("2026-03-25T10:00:00Z");
        let c = Countdown::until(now + Duration::milliseconds(999), now);
        assert!(!c.is_expired);
        assert_eq!(c.label, "00h : 00m : 00s");
    }

    #[test]
    fn test_expired() {
        let now = at("2026-03-25T10:00:00Z");
        assert_eq!(Countdown::until(now, now), Countdown::expired());
        assert_eq!(Countdown::until(now - Duration::hours(1), now), Countdown::expired());
        assert_eq!(Countdown::expired().label, "");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Countdown::expired()).unwrap();
        assert_eq!(json["isExpired"], true);
    }
}
