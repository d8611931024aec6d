// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the WeakLink usage bridge.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Literal reported to the application layer when no foreground app is known.
pub const UNKNOWN_APP: &str = "unknown";

/// One application's last-focused timestamp within a queried interval.
///
/// Supplied by the platform provider and read-only afterwards. The same
/// application may appear several times for one window (one record per
/// sub-interval).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Package name / bundle identifier.
    pub application_id: String,
    /// Milliseconds since the Unix epoch.
    pub last_used_ms: i64,
}

impl UsageRecord {
    pub fn new(application_id: impl Into<String>, last_used_ms: i64) -> Self {
        Self {
            application_id: application_id.into(),
            last_used_ms,
        }
    }
}

/// Outcome of foreground resolution.
///
/// Absence of data is `Unknown`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Resolved(String),
    Unknown,
}

impl Resolution {
    pub fn application_id(&self) -> Option<&str> {
        match self {
            Self::Resolved(id) => Some(id),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved(id) => f.write_str(id),
            Self::Unknown => f.write_str(UNKNOWN_APP),
        }
    }
}

/// Half-open query interval `[start_ms, end_ms)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// Window of `length` ending at `now_ms`. The start saturates at the epoch.
    pub fn ending_at(now_ms: i64, length: Duration) -> Self {
        let length_ms = i64::try_from(length.as_millis()).unwrap_or(i64::MAX);
        Self {
            start_ms: now_ms.saturating_sub(length_ms).max(0),
            end_ms: now_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        let span = self.end_ms.saturating_sub(self.start_ms).max(0);
        Duration::from_millis(u64::try_from(span).unwrap_or(0))
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }
}

/// An application installed on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub package_name: String,
    /// User-visible label.
    pub app_name: String,
    /// Flagged by the platform as a system component.
    pub is_system: bool,
}

/// Unique identifier for a detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked app was observed entering the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: EventId,
    pub app_identifier: String,
    pub app_name: String,
    pub detected_at: DateTime<Utc>,
}

impl DetectionEvent {
    pub fn new(app_identifier: String, app_name: String) -> Self {
        Self {
            id: EventId::new(),
            app_identifier,
            app_name,
            detected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_ends_at_now() {
        let window = TimeWindow::ending_at(50_000, Duration::from_secs(10));
        assert_eq!(window.start_ms, 40_000);
        assert_eq!(window.end_ms, 50_000);
        assert_eq!(window.duration(), Duration::from_secs(10));
    }

    #[test]
    fn window_start_saturates_at_epoch() {
        let window = TimeWindow::ending_at(500, Duration::from_secs(1_000));
        assert_eq!(window.start_ms, 0);
        assert_eq!(window.end_ms, 500);
    }

    #[test]
    fn window_is_half_open() {
        let window = TimeWindow { start_ms: 100, end_ms: 200 };
        assert!(window.contains(100));
        assert!(window.contains(199));
        assert!(!window.contains(200));
        assert!(!window.contains(99));
    }

    #[test]
    fn unknown_displays_as_literal() {
        assert_eq!(Resolution::Unknown.to_string(), "unknown");
        assert_eq!(Resolution::Resolved("com.a".into()).to_string(), "com.a");
        assert_eq!(Resolution::Unknown.application_id(), None);
    }
}
