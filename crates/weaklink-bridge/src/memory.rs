// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process bridge fed with scripted data.
//
// Used by host builds that replay recorded usage and by the service tests.
// Records are filtered by the requested window the way the platform would.

use std::sync::{Mutex, MutexGuard};

use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{InstalledApp, TimeWindow, UsageRecord};

use crate::traits::*;

/// Failure a [`MemoryBridge`] can be scripted to return from usage queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// `ProviderUnavailable(reason)`, as for a missing usage-stats service.
    ProviderUnavailable(String),
    /// `Bridge(detail)`, as for a failed native call.
    Bridge(String),
    /// `PlatformUnavailable`.
    PlatformUnavailable,
}

impl ScriptedFailure {
    fn to_error(&self) -> WeaklinkError {
        match self {
            Self::ProviderUnavailable(reason) => WeaklinkError::ProviderUnavailable(reason.clone()),
            Self::Bridge(detail) => WeaklinkError::Bridge(detail.clone()),
            Self::PlatformUnavailable => WeaklinkError::PlatformUnavailable,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<UsageRecord>,
    apps: Vec<InstalledApp>,
    /// When set, every usage query fails with this error.
    failure: Option<ScriptedFailure>,
    access_unsupported: bool,
    queried_windows: Vec<TimeWindow>,
    settings_opened: u32,
}

/// Bridge backed by in-memory records and app lists.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    state: Mutex<MemoryState>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge preloaded with `records`.
    pub fn with_records(records: Vec<UsageRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| WeaklinkError::Bridge("memory bridge lock poisoned".into()))
    }

    /// Replace the usage records.
    pub fn set_records(&self, records: Vec<UsageRecord>) -> Result<()> {
        self.lock()?.records = records;
        Ok(())
    }

    /// Append one usage record.
    pub fn push_record(&self, record: UsageRecord) -> Result<()> {
        self.lock()?.records.push(record);
        Ok(())
    }

    /// Replace the installed-app list.
    pub fn set_installed_apps(&self, apps: Vec<InstalledApp>) -> Result<()> {
        self.lock()?.apps = apps;
        Ok(())
    }

    /// Make usage queries fail with `ProviderUnavailable` (`Some(reason)`)
    /// or succeed again (`None`).
    pub fn set_unavailable(&self, reason: Option<&str>) -> Result<()> {
        self.set_failure(reason.map(|r| ScriptedFailure::ProviderUnavailable(r.to_owned())))
    }

    /// Make usage queries fail with `failure`, or succeed again with `None`.
    pub fn set_failure(&self, failure: Option<ScriptedFailure>) -> Result<()> {
        self.lock()?.failure = failure;
        Ok(())
    }

    /// Declare whether usage access can be inferred from queries.
    pub fn set_usage_access_supported(&self, supported: bool) -> Result<()> {
        self.lock()?.access_unsupported = !supported;
        Ok(())
    }

    /// Every window passed to `query_usage`, oldest first.
    pub fn queried_windows(&self) -> Result<Vec<TimeWindow>> {
        Ok(self.lock()?.queried_windows.clone())
    }

    /// How many times the usage-access settings screen was requested.
    pub fn settings_opened(&self) -> Result<u32> {
        Ok(self.lock()?.settings_opened)
    }
}

impl PlatformBridge for MemoryBridge {
    fn platform_name(&self) -> &str {
        "Memory"
    }
}

impl UsageStatsProvider for MemoryBridge {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>> {
        let mut state = self.lock()?;
        state.queried_windows.push(window);

        if let Some(failure) = &state.failure {
            return Err(failure.to_error());
        }

        let records: Vec<UsageRecord> = state
            .records
            .iter()
            .filter(|r| window.contains(r.last_used_ms))
            .cloned()
            .collect();
        tracing::debug!(
            start_ms = window.start_ms,
            end_ms = window.end_ms,
            count = records.len(),
            "memory bridge: usage query"
        );
        Ok(records)
    }
}

impl InstalledAppsProvider for MemoryBridge {
    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        Ok(self.lock()?.apps.clone())
    }
}

impl UsageAccessSettings for MemoryBridge {
    fn supports_usage_access(&self) -> bool {
        self.lock().map(|s| !s.access_unsupported).unwrap_or(false)
    }

    fn open_usage_access_settings(&self) -> Result<()> {
        self.lock()?.settings_opened += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filters_to_window() {
        let bridge = MemoryBridge::with_records(vec![
            UsageRecord::new("com.old", 50),
            UsageRecord::new("com.inside", 150),
            UsageRecord::new("com.edge", 200),
        ]);
        let records = bridge
            .query_usage(TimeWindow { start_ms: 100, end_ms: 200 })
            .expect("query");
        assert_eq!(records, vec![UsageRecord::new("com.inside", 150)]);
    }

    #[test]
    fn unavailable_reports_reason_and_records_window() {
        let bridge = MemoryBridge::new();
        bridge.set_unavailable(Some("usage access revoked")).expect("set");
        let window = TimeWindow { start_ms: 0, end_ms: 1 };

        let err = bridge.query_usage(window).expect_err("should fail");
        assert!(matches!(err, WeaklinkError::ProviderUnavailable(ref r) if r == "usage access revoked"));
        assert_eq!(bridge.queried_windows().expect("windows"), vec![window]);
    }

    #[test]
    fn scripted_failures_map_to_errors() {
        let bridge = MemoryBridge::new();
        let window = TimeWindow { start_ms: 0, end_ms: 1 };

        bridge.set_failure(Some(ScriptedFailure::Bridge("jni call failed".into()))).expect("set");
        assert!(matches!(bridge.query_usage(window), Err(WeaklinkError::Bridge(ref d)) if d == "jni call failed"));

        bridge.set_failure(Some(ScriptedFailure::PlatformUnavailable)).expect("set");
        assert!(matches!(bridge.query_usage(window), Err(WeaklinkError::PlatformUnavailable)));

        bridge.set_failure(None).expect("clear");
        assert!(bridge.query_usage(window).expect("query").is_empty());
    }

    #[test]
    fn usage_access_support_is_scriptable() {
        let bridge = MemoryBridge::new();
        assert!(bridge.supports_usage_access());
        bridge.set_usage_access_supported(false).expect("set");
        assert!(!bridge.supports_usage_access());
    }

    #[test]
    fn settings_requests_are_counted() {
        let bridge = MemoryBridge::new();
        bridge.open_usage_access_settings().expect("open");
        bridge.open_usage_access_settings().expect("open");
        assert_eq!(bridge.settings_opened().expect("count"), 2);
    }
}
