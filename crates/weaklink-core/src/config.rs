// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration and its JSON persistence.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, WeaklinkError};

/// File name of the persisted config inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Window queried when resolving the current foreground app.
    #[serde(with = "duration_ms", rename = "foreground_window_ms")]
    pub foreground_window: Duration,
    /// Wide window used to probe whether usage access is granted.
    #[serde(with = "duration_ms", rename = "permission_probe_window_ms")]
    pub permission_probe_window: Duration,
    /// How often the watcher polls the foreground app.
    #[serde(with = "duration_ms", rename = "poll_interval_ms")]
    pub poll_interval: Duration,
    /// Whether the tracked-app watcher runs at all.
    pub watcher_enabled: bool,
    /// Identifiers (package names / bundle ids) the watcher reports on.
    pub tracked_apps: Vec<String>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            foreground_window: Duration::from_secs(10),
            permission_probe_window: Duration::from_millis(1_000_000),
            poll_interval: Duration::from_secs(5),
            watcher_enabled: true,
            tracked_apps: Vec::new(),
        }
    }
}

impl UsageConfig {
    /// Reject settings that would make the services misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.foreground_window.is_zero() {
            return Err(WeaklinkError::Config("foreground window must be non-zero".into()));
        }
        if self.permission_probe_window < self.foreground_window {
            return Err(WeaklinkError::Config(
                "permission probe window must be at least the foreground window".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(WeaklinkError::Config("poll interval must be non-zero".into()));
        }
        Ok(())
    }

    /// Whether the watcher has anything to do.
    pub fn watcher_active(&self) -> bool {
        self.watcher_enabled && !self.tracked_apps.is_empty()
    }

    /// Read `config.json` from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let json = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load) but falls back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(data_dir: &Path) -> Self {
        match Self::load(data_dir) {
            Ok(config) => config,
            Err(WeaklinkError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "config unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON to `data_dir/config.json`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }
}

/// Durations are stored as integer milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = UsageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.foreground_window, Duration::from_secs(10));
        assert!(!config.watcher_active());
    }

    #[test]
    fn save_and_load_through_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = UsageConfig {
            tracked_apps: vec!["com.instagram.android".into()],
            poll_interval: Duration::from_secs(2),
            ..UsageConfig::default()
        };
        config.save(dir.path()).expect("save");

        let loaded = UsageConfig::load(dir.path()).expect("load");
        assert_eq!(loaded, config);
        assert!(loaded.watcher_active());
    }

    #[test]
    fn durations_are_written_as_millis() {
        let json = serde_json::to_value(UsageConfig::default()).expect("serialize");
        assert_eq!(json["foreground_window_ms"], 10_000);
        assert_eq!(json["permission_probe_window_ms"], 1_000_000);
        assert_eq!(json["poll_interval_ms"], 5_000);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: UsageConfig =
            serde_json::from_str(r#"{"tracked_apps":["com.a"]}"#).expect("parse");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.tracked_apps, vec!["com.a".to_string()]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(UsageConfig::load_or_default(dir.path()), UsageConfig::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").expect("write");
        assert!(matches!(
            UsageConfig::load(dir.path()),
            Err(WeaklinkError::Serialization(_))
        ));
        assert_eq!(UsageConfig::load_or_default(dir.path()), UsageConfig::default());
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let config = UsageConfig {
            poll_interval: Duration::ZERO,
            ..UsageConfig::default()
        };
        assert!(matches!(config.validate(), Err(WeaklinkError::Config(_))));
    }
}
