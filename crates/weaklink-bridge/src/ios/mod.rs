// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge.
//
// iOS gives third-party apps no per-app foreground history and no list of
// installed applications. Screen Time (FamilyControls / DeviceActivity) only
// hands out opaque tokens to Swift extensions, so the host app owns that
// integration and this bridge reports what Rust can know:
//
// - usage queries answer with no records, which resolves to "unknown";
// - usage access cannot be probed that way, so it is reported unsupported;
// - installed-app listing and the usage-access screen are unavailable.

#![cfg(target_os = "ios")]

use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{InstalledApp, TimeWindow, UsageRecord};

use crate::traits::*;

/// iOS implementation of the WeakLink platform bridge.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

impl UsageStatsProvider for IosBridge {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>> {
        tracing::debug!(
            start_ms = window.start_ms,
            end_ms = window.end_ms,
            "iOS: foreground history not exposed, answering with no records"
        );
        Ok(Vec::new())
    }
}

impl InstalledAppsProvider for IosBridge {
    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        tracing::warn!("iOS: installed applications cannot be enumerated");
        Err(WeaklinkError::PlatformUnavailable)
    }
}

impl UsageAccessSettings for IosBridge {
    fn supports_usage_access(&self) -> bool {
        false
    }

    fn open_usage_access_settings(&self) -> Result<()> {
        // FamilyControls authorization must be requested from Swift.
        Err(WeaklinkError::PlatformUnavailable)
    }
}
