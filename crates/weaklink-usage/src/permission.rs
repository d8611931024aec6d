// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Usage-access capability probe.
//
// Android has no direct "is usage access granted" query for the calling app;
// without the grant, `queryUsageStats` simply returns nothing. The probe
// therefore asks for a wide window where any active device has records and
// treats an empty answer as "not granted".

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use weaklink_bridge::PlatformBridge;
use weaklink_core::UsageConfig;
use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::TimeWindow;

use crate::foreground::fetch_window;

/// Whether the usage provider can currently be queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageAccess {
    /// The probe window returned records.
    Granted,
    /// Provider reachable but silent — the grant is missing.
    NotGranted,
    /// Provider could not be reached, or the platform offers no way to
    /// tell whether access was granted.
    Unavailable(String),
}

impl UsageAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Probes usage access separately from data retrieval.
pub struct PermissionProbe {
    bridge: Arc<dyn PlatformBridge>,
    window: Duration,
}

impl PermissionProbe {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &UsageConfig) -> Self {
        Self {
            bridge,
            window: config.permission_probe_window,
        }
    }

    /// Probe as of `now_ms`.
    #[instrument(skip(self))]
    pub fn check_at(&self, now_ms: i64) -> UsageAccess {
        if !self.bridge.supports_usage_access() {
            let platform = self.bridge.platform_name();
            warn!(platform, "usage access cannot be probed on this platform");
            return UsageAccess::Unavailable(format!("usage access is not exposed on {platform}"));
        }

        let window = TimeWindow::ending_at(now_ms, self.window);
        let access = match fetch_window(self.bridge.as_ref(), window) {
            Ok(_) => UsageAccess::Granted,
            Err(WeaklinkError::ProviderEmpty) => UsageAccess::NotGranted,
            Err(e) => {
                warn!(error = %e, "usage access probe failed");
                UsageAccess::Unavailable(e.to_string())
            }
        };
        info!(?access, "usage access probed");
        access
    }

    /// Probe now.
    pub fn check(&self) -> UsageAccess {
        self.check_at(crate::now_ms())
    }

    pub fn is_granted(&self) -> bool {
        self.check().is_granted()
    }

    /// Send the user to the platform's usage-access settings screen.
    pub fn request_access(&self) -> Result<()> {
        info!(platform = self.bridge.platform_name(), "opening usage access settings");
        self.bridge.open_usage_access_settings()
    }
}
