// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WeakLink — usage services built on the platform bridge.
//
// `ForegroundService` resolves the current foreground app, `PermissionProbe`
// checks whether usage access is granted, `AppCatalog` lists user-installed
// apps with display names, and `AppWatcher` reports tracked apps as they
// come to the foreground.

pub mod apps;
pub mod foreground;
pub mod permission;
pub mod watcher;

pub use apps::AppCatalog;
pub use foreground::ForegroundService;
pub use permission::{PermissionProbe, UsageAccess};
pub use watcher::{AppWatcher, HostActivity, WatcherHandle};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
