// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tracked-app watcher.
//
// Polls the foreground app on a fixed interval while the host app is active
// and emits a `DetectionEvent` each time a tracked app newly comes to the
// foreground. Bridge calls are blocking (JNI), so each lookup runs on the
// blocking pool.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use weaklink_core::UsageConfig;
use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{DetectionEvent, Resolution};

use crate::apps::AppCatalog;
use crate::foreground::ForegroundService;

/// Capacity of the detection event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Shared flag telling the watcher whether the host app is in the foreground
/// of its own lifecycle (not backgrounded by the OS).
#[derive(Debug, Clone)]
pub struct HostActivity(Arc<AtomicBool>);

impl HostActivity {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for HostActivity {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Detects tracked apps entering the foreground.
pub struct AppWatcher {
    foreground: Arc<ForegroundService>,
    catalog: Arc<AppCatalog>,
    tracked: HashSet<String>,
    enabled: bool,
    poll_interval: Duration,
    host: HostActivity,
    /// Foreground app seen on the last resolved tick.
    last_seen: Option<String>,
}

impl AppWatcher {
    pub fn new(
        foreground: Arc<ForegroundService>,
        catalog: Arc<AppCatalog>,
        config: &UsageConfig,
    ) -> Self {
        Self {
            foreground,
            catalog,
            tracked: config.tracked_apps.iter().cloned().collect(),
            enabled: config.watcher_enabled,
            poll_interval: config.poll_interval,
            host: HostActivity::default(),
            last_seen: None,
        }
    }

    /// Handle for reporting host lifecycle changes.
    pub fn host_activity(&self) -> HostActivity {
        self.host.clone()
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    pub fn is_tracked(&self, identifier: &str) -> bool {
        self.tracked.contains(identifier)
    }

    /// Feed one resolution through the dedup rule.
    ///
    /// `Unknown` leaves the state untouched. Any resolved app becomes the new
    /// last-seen app; an event is produced only when it is tracked and differs
    /// from the previous one.
    pub fn observe(&mut self, resolution: &Resolution) -> Option<DetectionEvent> {
        let app = resolution.application_id()?;
        let entered = self.last_seen.as_deref() != Some(app);
        if entered {
            trace!(app, "foreground changed");
            self.last_seen = Some(app.to_owned());
        }

        if entered && self.is_tracked(app) {
            let event = DetectionEvent::new(app.to_owned(), self.catalog.display_name(app));
            info!(app = %event.app_identifier, name = %event.app_name, "tracked app detected");
            Some(event)
        } else {
            None
        }
    }

    /// One synchronous tick as of `now_ms`. Skipped while the host is inactive.
    pub fn check_at(&mut self, now_ms: i64) -> Result<Option<DetectionEvent>> {
        if !self.host.is_active() {
            trace!("host inactive, skipping tick");
            return Ok(None);
        }
        let resolution = self.foreground.current_at(now_ms)?;
        Ok(self.observe(&resolution))
    }

    /// Start polling on the current Tokio runtime.
    ///
    /// Returns `None` when the watcher is disabled or nothing is tracked.
    pub fn spawn(self) -> Option<(WatcherHandle, mpsc::Receiver<DetectionEvent>)> {
        if !self.enabled || self.tracked.is_empty() {
            debug!(enabled = self.enabled, tracked = self.tracked.len(), "watcher not started");
            return None;
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let shutdown = Arc::new(Notify::new());
        let host = self.host.clone();
        let signal = Arc::clone(&shutdown);

        info!(
            tracked = self.tracked.len(),
            interval_ms = u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX),
            "starting app watcher"
        );
        let task = tokio::spawn(self.run(signal, tx));

        Some((
            WatcherHandle {
                shutdown,
                task,
                host,
            },
            rx,
        ))
    }

    /// The polling loop. Runs until shutdown or until the receiver is dropped.
    async fn run(mut self, shutdown: Arc<Notify>, tx: mpsc::Sender<DetectionEvent>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    debug!("watcher received shutdown signal");
                    break;
                }

                _ = ticker.tick() => {
                    if !self.host.is_active() {
                        trace!("host inactive, skipping tick");
                        continue;
                    }

                    let foreground = Arc::clone(&self.foreground);
                    let resolution = match tokio::task::spawn_blocking(move || foreground.current()).await {
                        Ok(Ok(resolution)) => resolution,
                        Ok(Err(e)) => {
                            warn!(error = %e, "foreground lookup failed");
                            continue;
                        }
                        Err(e) => {
                            warn!(error = %e, "foreground lookup task failed");
                            continue;
                        }
                    };

                    let Some(event) = self.observe(&resolution) else { continue };

                    // A full channel must not hold off shutdown.
                    tokio::select! {
                        sent = tx.send(event) => {
                            if sent.is_err() {
                                debug!("detection receiver dropped, stopping watcher");
                                break;
                            }
                        }
                        _ = shutdown.notified() => {
                            debug!("watcher received shutdown signal while delivering");
                            break;
                        }
                    }
                }
            }
        }

        info!("app watcher stopped");
    }
}

/// Running watcher. Dropping it leaves the task running; call [`stop`].
///
/// [`stop`]: WatcherHandle::stop
pub struct WatcherHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
    host: HostActivity,
}

impl WatcherHandle {
    pub fn host_activity(&self) -> HostActivity {
        self.host.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) -> Result<()> {
        self.shutdown.notify_one();
        self.task
            .await
            .map_err(|e| WeaklinkError::Watcher(format!("task join: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weaklink_bridge::{MemoryBridge, PlatformBridge};
    use weaklink_core::types::UsageRecord;

    const NOW: i64 = 1_700_000_000_000;

    fn config(tracked: &[&str]) -> UsageConfig {
        UsageConfig {
            tracked_apps: tracked.iter().map(|s| (*s).to_owned()).collect(),
            poll_interval: Duration::from_millis(10),
            ..UsageConfig::default()
        }
    }

    fn watcher(bridge: &Arc<MemoryBridge>, config: &UsageConfig) -> AppWatcher {
        let shared: Arc<dyn PlatformBridge> = Arc::clone(bridge) as Arc<dyn PlatformBridge>;
        let foreground = Arc::new(ForegroundService::new(Arc::clone(&shared), config));
        let catalog = Arc::new(AppCatalog::new(shared));
        AppWatcher::new(foreground, catalog, config)
    }

    fn resolved(app: &str) -> Resolution {
        Resolution::Resolved(app.into())
    }

    #[test]
    fn tracked_app_produces_named_event() {
        let bridge = Arc::new(MemoryBridge::new());
        let mut w = watcher(&bridge, &config(&["com.instagram.android"]));

        let event = w.observe(&resolved("com.instagram.android")).expect("event");
        assert_eq!(event.app_identifier, "com.instagram.android");
        assert_eq!(event.app_name, "Instagram");
    }

    #[test]
    fn staying_in_tracked_app_reports_once() {
        let bridge = Arc::new(MemoryBridge::new());
        let mut w = watcher(&bridge, &config(&["com.a"]));

        assert!(w.observe(&resolved("com.a")).is_some());
        assert!(w.observe(&resolved("com.a")).is_none());
        assert!(w.observe(&resolved("com.a")).is_none());
    }

    #[test]
    fn returning_to_tracked_app_reports_again() {
        let bridge = Arc::new(MemoryBridge::new());
        let mut w = watcher(&bridge, &config(&["com.a"]));

        assert!(w.observe(&resolved("com.a")).is_some());
        assert!(w.observe(&resolved("com.other")).is_none());
        assert!(w.observe(&resolved("com.a")).is_some());
    }

    #[test]
    fn unknown_does_not_reset_last_seen() {
        let bridge = Arc::new(MemoryBridge::new());
        let mut w = watcher(&bridge, &config(&["com.a"]));

        assert!(w.observe(&resolved("com.a")).is_some());
        assert!(w.observe(&Resolution::Unknown).is_none());
        assert_eq!(w.last_seen(), Some("com.a"));
        assert!(w.observe(&resolved("com.a")).is_none());
    }

    #[test]
    fn untracked_apps_never_report() {
        let bridge = Arc::new(MemoryBridge::new());
        let mut w = watcher(&bridge, &config(&["com.a"]));
        assert!(w.observe(&resolved("com.b")).is_none());
        assert_eq!(w.last_seen(), Some("com.b"));
    }

    #[test]
    fn inactive_host_skips_lookup() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![UsageRecord::new(
            "com.a",
            NOW - 1_000,
        )]));
        let mut w = watcher(&bridge, &config(&["com.a"]));
        w.host_activity().set_active(false);

        assert!(w.check_at(NOW).expect("tick").is_none());
        assert!(bridge.queried_windows().expect("windows").is_empty());

        w.host_activity().set_active(true);
        assert!(w.check_at(NOW).expect("tick").is_some());
    }

    #[test]
    fn lookup_failure_propagates_from_tick() {
        let bridge = Arc::new(MemoryBridge::new());
        bridge.set_unavailable(Some("no grant")).expect("set");
        let mut w = watcher(&bridge, &config(&["com.a"]));
        assert!(matches!(
            w.check_at(NOW),
            Err(WeaklinkError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn spawn_refuses_when_nothing_tracked() {
        let bridge = Arc::new(MemoryBridge::new());
        assert!(watcher(&bridge, &config(&[])).spawn().is_none());

        let disabled = UsageConfig {
            watcher_enabled: false,
            ..config(&["com.a"])
        };
        assert!(watcher(&bridge, &disabled).spawn().is_none());
    }

    #[tokio::test]
    async fn spawned_watcher_delivers_and_stops() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![UsageRecord::new(
            "com.instagram.android",
            crate::now_ms() - 1_000,
        )]));
        let (handle, mut rx) = watcher(&bridge, &config(&["com.instagram.android"]))
            .spawn()
            .expect("watcher started");

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event before timeout")
            .expect("channel open");
        assert_eq!(event.app_name, "Instagram");

        handle.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn stop_returns_while_event_channel_is_full() {
        let bridge = Arc::new(MemoryBridge::new());
        let config = UsageConfig {
            poll_interval: Duration::from_millis(1),
            ..config(&["com.a", "com.b"])
        };
        let (handle, rx) = watcher(&bridge, &config).spawn().expect("watcher started");

        // Alternate the foreground so every tick is a new detection; nobody
        // reads `rx`, so the channel fills up.
        for i in 0..(EVENT_CHANNEL_CAPACITY * 8) {
            let app = if i % 2 == 0 { "com.a" } else { "com.b" };
            bridge
                .set_records(vec![UsageRecord::new(app, crate::now_ms() - 1_000)])
                .expect("set");
            tokio::time::sleep(Duration::from_millis(3)).await;
        }

        tokio::time::timeout(Duration::from_secs(3), handle.stop())
            .await
            .expect("stop before timeout")
            .expect("stop");
        drop(rx);
    }

    #[tokio::test]
    async fn watcher_exits_when_receiver_dropped() {
        let bridge = Arc::new(MemoryBridge::with_records(vec![UsageRecord::new(
            "com.a",
            crate::now_ms() - 1_000,
        )]));
        let (handle, rx) = watcher(&bridge, &config(&["com.a"]))
            .spawn()
            .expect("watcher started");
        drop(rx);

        tokio::time::timeout(Duration::from_secs(5), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("watcher finished");
        handle.stop().await.expect("stop");
    }
}
