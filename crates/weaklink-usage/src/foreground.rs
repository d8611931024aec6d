// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Foreground-app lookup: query a short recent window, then resolve.
//
// Provider failures are surfaced as `ProviderUnavailable`; a reachable
// provider with no records is `ProviderEmpty` at the fetch level and
// `Resolution::Unknown` at the lookup level.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use weaklink_bridge::PlatformBridge;
use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{Resolution, TimeWindow, UsageRecord};
use weaklink_core::{UsageConfig, resolve_foreground};

/// Query `bridge` over `window`, classifying the outcome.
///
/// Bridge-level failures collapse into `ProviderUnavailable` so callers only
/// need to tell "cannot ask" from "asked, got nothing".
pub(crate) fn fetch_window(
    bridge: &dyn PlatformBridge,
    window: TimeWindow,
) -> Result<Vec<UsageRecord>> {
    match bridge.query_usage(window) {
        Ok(records) if records.is_empty() => Err(WeaklinkError::ProviderEmpty),
        Ok(records) => Ok(records),
        Err(WeaklinkError::Bridge(detail)) => Err(WeaklinkError::ProviderUnavailable(detail)),
        Err(e) => Err(e),
    }
}

/// Resolves which app currently holds the foreground.
pub struct ForegroundService {
    bridge: Arc<dyn PlatformBridge>,
    /// Length of the recent window queried per lookup.
    window: Duration,
}

impl ForegroundService {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &UsageConfig) -> Self {
        Self {
            bridge,
            window: config.foreground_window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Raw records for a window of `length` ending at `now_ms`.
    pub fn fetch_records(&self, now_ms: i64, length: Duration) -> Result<Vec<UsageRecord>> {
        fetch_window(self.bridge.as_ref(), TimeWindow::ending_at(now_ms, length))
    }

    /// Resolve the foreground app as of `now_ms`.
    #[instrument(skip(self), fields(platform = self.bridge.platform_name()))]
    pub fn current_at(&self, now_ms: i64) -> Result<Resolution> {
        match self.fetch_records(now_ms, self.window) {
            Ok(records) => {
                let resolution = resolve_foreground(&records);
                debug!(records = records.len(), %resolution, "foreground resolved");
                Ok(resolution)
            }
            Err(WeaklinkError::ProviderEmpty) => {
                debug!("no usage records in window");
                Ok(Resolution::Unknown)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the foreground app now.
    pub fn current(&self) -> Result<Resolution> {
        self.current_at(crate::now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weaklink_bridge::{MemoryBridge, ScriptedFailure};

    const NOW: i64 = 1_700_000_000_000;

    fn service(bridge: &Arc<MemoryBridge>) -> ForegroundService {
        let shared: Arc<dyn PlatformBridge> = Arc::clone(bridge) as Arc<dyn PlatformBridge>;
        ForegroundService::new(shared, &UsageConfig::default())
    }

    #[test]
    fn resolves_latest_app_in_window() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![
            UsageRecord::new("com.instagram.android", NOW - 8_000),
            UsageRecord::new("com.android.chrome", NOW - 2_000),
        ]));
        let resolution = service(&bridge).current_at(NOW).expect("resolve");
        assert_eq!(resolution, Resolution::Resolved("com.android.chrome".into()));
    }

    #[test]
    fn queries_ten_second_window_ending_now() {
        let bridge = Arc::new(MemoryBridge::new());
        service(&bridge).current_at(NOW).expect("resolve");
        let windows = bridge.queried_windows().expect("windows");
        assert_eq!(windows, vec![TimeWindow { start_ms: NOW - 10_000, end_ms: NOW }]);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![UsageRecord::new(
            "com.old",
            NOW - 60_000,
        )]));
        let resolution = service(&bridge).current_at(NOW).expect("resolve");
        assert_eq!(resolution, Resolution::Unknown);
    }

    #[test]
    fn empty_provider_is_distinct_from_unavailable() {
        let bridge = Arc::new(MemoryBridge::new());
        let svc = service(&bridge);
        assert!(matches!(
            svc.fetch_records(NOW, Duration::from_secs(10)),
            Err(WeaklinkError::ProviderEmpty)
        ));

        bridge.set_unavailable(Some("service not bound")).expect("set");
        assert!(matches!(
            svc.fetch_records(NOW, Duration::from_secs(10)),
            Err(WeaklinkError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn native_call_failure_becomes_provider_unavailable() {
        let bridge = Arc::new(MemoryBridge::new());
        bridge.set_failure(Some(ScriptedFailure::Bridge("queryUsageStats threw".into()))).expect("set");
        let err = service(&bridge).current_at(NOW).expect_err("should surface failure");
        assert!(matches!(err, WeaklinkError::ProviderUnavailable(ref d) if d == "queryUsageStats threw"));
    }

    #[test]
    fn unsupported_platform_passes_through() {
        let bridge = Arc::new(MemoryBridge::new());
        bridge.set_failure(Some(ScriptedFailure::PlatformUnavailable)).expect("set");
        assert!(matches!(
            service(&bridge).current_at(NOW),
            Err(WeaklinkError::PlatformUnavailable)
        ));
    }

    #[test]
    fn unavailable_provider_is_never_resolved() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![UsageRecord::new(
            "com.a",
            NOW - 1,
        )]));
        bridge.set_unavailable(Some("usage access missing")).expect("set");
        let err = service(&bridge).current_at(NOW).expect_err("should surface failure");
        assert!(matches!(err, WeaklinkError::ProviderUnavailable(ref r) if r == "usage access missing"));
    }
}
