// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Every data method returns `PlatformUnavailable` — real implementations live
// in the `ios` and `android` modules.

use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{InstalledApp, TimeWindow, UsageRecord};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl UsageStatsProvider for StubBridge {
    fn query_usage(&self, _window: TimeWindow) -> Result<Vec<UsageRecord>> {
        tracing::warn!("UsageStatsProvider::query_usage called on stub bridge");
        Err(WeaklinkError::PlatformUnavailable)
    }
}

impl InstalledAppsProvider for StubBridge {
    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        tracing::warn!("InstalledAppsProvider::installed_apps called on stub bridge");
        Err(WeaklinkError::PlatformUnavailable)
    }
}

impl UsageAccessSettings for StubBridge {
    fn supports_usage_access(&self) -> bool {
        false
    }

    fn open_usage_access_settings(&self) -> Result<()> {
        Err(WeaklinkError::PlatformUnavailable)
    }
}
