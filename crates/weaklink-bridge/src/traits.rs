// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// Each trait is a single passthrough into a platform service. Post-processing
// (picking the foreground app, filtering system apps) belongs to the usage
// services, not to the bridge.

use weaklink_core::error::Result;
use weaklink_core::types::{InstalledApp, TimeWindow, UsageRecord};

/// Unified bridge that groups all native capabilities.
///
/// Shared across threads by the watcher, hence `Send + Sync`.
pub trait PlatformBridge:
    UsageStatsProvider + InstalledAppsProvider + UsageAccessSettings + Send + Sync
{
    /// Human-readable platform name (e.g. "Android", "iOS").
    fn platform_name(&self) -> &str;
}

/// Per-application usage records for a time window.
pub trait UsageStatsProvider {
    /// Return every record the platform observed in `window`.
    ///
    /// An empty vector means the service answered with nothing; on Android
    /// that is also what a missing usage-access grant looks like. Returns
    /// `ProviderUnavailable` if the service itself cannot be reached.
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>>;
}

/// Applications installed on the device.
pub trait InstalledAppsProvider {
    /// All installed applications, system components included and flagged.
    fn installed_apps(&self) -> Result<Vec<InstalledApp>>;
}

/// Send the user to the OS screen where usage access is granted.
pub trait UsageAccessSettings {
    /// Whether usage access can be inferred from `query_usage` at all.
    ///
    /// Platforms that answer every query with nothing, whatever the grant,
    /// return `false` so an empty answer is not read as a missing grant.
    fn supports_usage_access(&self) -> bool {
        true
    }

    /// Open the settings screen. Returns Ok(()) once it was presented; the
    /// user may still decline.
    fn open_usage_access_settings(&self) -> Result<()>;
}
