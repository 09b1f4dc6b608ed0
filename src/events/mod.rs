//! Events and workshops promoted on the site

mod countdown;

pub use countdown::Countdown;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::helpers::{format_date_short, format_datetime_long};

/// How long an event stays live after it starts (1h30)
pub const EVENT_DURATION_MINUTES: i64 = 90;

/// A configured event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    /// Start time with its UTC offset, e.g. "2026-04-15T09:00:00+07:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
}

impl EventMeta {
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::at(self.start_at, now)
    }

    /// Countdown to the start, if the event has one
    pub fn countdown_at(&self, now: DateTime<Utc>) -> Option<Countdown> {
        self.start_at
            .map(|start| Countdown::until(start.with_timezone(&Utc), now))
    }
}

/// Lifecycle of an event relative to the current time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// No fixed start time
    Open,
    Upcoming,
    Live,
    Ended,
}

impl EventStatus {
    pub fn at(start_at: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> Self {
        let Some(start) = start_at.map(|s| s.with_timezone(&Utc)) else {
            return EventStatus::Open;
        };

        if now < start {
            EventStatus::Upcoming
        } else if now < start + Duration::minutes(EVENT_DURATION_MINUTES) {
            EventStatus::Live
        } else {
            EventStatus::Ended
        }
    }

    /// Badge colour for the status
    pub fn color(&self) -> &'static str {
        match self {
            EventStatus::Open => "blue",
            EventStatus::Upcoming => "gold",
            EventStatus::Live => "red",
            EventStatus::Ended => "default",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "open",
            EventStatus::Upcoming => "upcoming",
            EventStatus::Live => "live",
            EventStatus::Ended => "ended",
        }
    }
}

/// An event with its status and display dates resolved for one moment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub status: EventStatus,
    pub status_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_long: Option<String>,
}

/// The configured events, in configuration order
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<EventMeta>,
    tz: Tz,
}

impl EventCatalog {
    pub fn new(events: Vec<EventMeta>, tz: Tz) -> Self {
        Self { events, tz }
    }

    pub fn all(&self) -> &[EventMeta] {
        &self.events
    }

    pub fn get(&self, slug: &str) -> Option<&EventMeta> {
        self.events.iter().find(|e| e.slug == slug)
    }

    /// Resolve one event for display at `now`
    pub fn view(&self, event: &EventMeta, now: DateTime<Utc>) -> EventView {
        let status = event.status_at(now);
        let local = event.start_at.map(|s| s.with_timezone(&self.tz));

        EventView {
            meta: event.clone(),
            status,
            status_color: status.color(),
            date_short: local.as_ref().map(|d| format_date_short(d)),
            date_long: local.as_ref().map(|d| format_datetime_long(d)),
        }
    }

    pub fn views(&self, now: DateTime<Utc>) -> Vec<EventView> {
        self.events.iter().map(|e| self.view(e, now)).collect()
    }
}
