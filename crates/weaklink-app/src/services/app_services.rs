// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — initialises the bridge and usage services once
// and hands them to the host loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use weaklink_bridge::{PlatformBridge, platform_bridge};
use weaklink_core::UsageConfig;
use weaklink_core::error::Result;
use weaklink_core::types::{DetectionEvent, InstalledApp, Resolution};
use weaklink_usage::{AppCatalog, AppWatcher, ForegroundService, PermissionProbe, UsageAccess, WatcherHandle};

use super::data_dir;

/// Shared application services. All fields are Arc-wrapped so the struct is
/// cheap to clone into tasks.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: UsageConfig,
    bridge: Arc<dyn PlatformBridge>,
    foreground: Arc<ForegroundService>,
    catalog: Arc<AppCatalog>,
    probe: Arc<PermissionProbe>,
}

#[allow(dead_code)]
impl AppServices {
    /// Initialise all services.  Call once at startup.
    ///
    /// Resolves the data directory, loads the persisted config (defaults on
    /// a missing or damaged file) and selects the bridge for this platform.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising app services");
        let bridge: Arc<dyn PlatformBridge> = Arc::from(platform_bridge());
        Ok(Self::with_bridge(dir, bridge))
    }

    /// Build the services over an explicit bridge.
    pub fn with_bridge(data_dir: PathBuf, bridge: Arc<dyn PlatformBridge>) -> Self {
        let config = UsageConfig::load_or_default(&data_dir);
        Self::build(data_dir, config, bridge)
    }

    fn build(data_dir: PathBuf, config: UsageConfig, bridge: Arc<dyn PlatformBridge>) -> Self {
        let foreground = Arc::new(ForegroundService::new(Arc::clone(&bridge), &config));
        let catalog = Arc::new(AppCatalog::new(Arc::clone(&bridge)));
        let probe = Arc::new(PermissionProbe::new(Arc::clone(&bridge), &config));

        info!(
            platform = bridge.platform_name(),
            tracked = config.tracked_apps.len(),
            "app services initialised"
        );

        Self {
            data_dir,
            config,
            bridge,
            foreground,
            catalog,
            probe,
        }
    }

    pub fn config(&self) -> &UsageConfig {
        &self.config
    }

    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Usage access --------------------------------------------------------

    pub fn usage_access(&self) -> UsageAccess {
        self.probe.check()
    }

    /// Probe access and, if it is missing, open the settings screen.
    pub fn ensure_usage_access(&self) -> UsageAccess {
        let access = self.usage_access();
        if access == UsageAccess::NotGranted {
            if let Err(e) = self.probe.request_access() {
                warn!(error = %e, "could not open usage access settings");
            }
        }
        access
    }

    // -- Apps ----------------------------------------------------------------

    pub fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        self.catalog.installed_apps()
    }

    pub fn current_foreground(&self) -> Result<Resolution> {
        self.foreground.current()
    }

    /// Start the tracked-app watcher. `None` if it is disabled or idle.
    pub fn start_watcher(&self) -> Option<(WatcherHandle, mpsc::Receiver<DetectionEvent>)> {
        AppWatcher::new(
            Arc::clone(&self.foreground),
            Arc::clone(&self.catalog),
            &self.config,
        )
        .spawn()
    }

    // -- Config persistence --------------------------------------------------

    /// Persist `config` and rebuild the services from it.
    ///
    /// A watcher that is already running keeps its old settings until it is
    /// restarted.
    pub fn save_config(&mut self, config: UsageConfig) -> Result<()> {
        config.save(&self.data_dir)?;
        *self = Self::build(self.data_dir.clone(), config, Arc::clone(&self.bridge));
        Ok(())
    }
}
