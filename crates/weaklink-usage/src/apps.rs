// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Installed-app catalog: user apps only, plus display names for identifiers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, instrument};

use weaklink_bridge::PlatformBridge;
use weaklink_core::error::Result;
use weaklink_core::types::InstalledApp;

/// Labels for the apps groups most often track, on both platforms.
const KNOWN_APPS: &[(&str, &str)] = &[
    ("com.instagram.android", "Instagram"),
    ("com.zhiliaoapp.musically", "TikTok"),
    ("com.snapchat.android", "Snapchat"),
    ("com.twitter.android", "Twitter"),
    ("com.facebook.katana", "Facebook"),
    ("com.google.android.youtube", "YouTube"),
    ("com.android.chrome", "Chrome"),
    ("com.apple.mobilesafari", "Safari"),
    ("com.burbn.instagram", "Instagram"),
    ("com.atebits.Tweetie2", "Twitter"),
    ("com.toyopagroup.picaboo", "Snapchat"),
];

/// Built-in label for a well-known identifier.
pub fn known_app_name(identifier: &str) -> Option<&'static str> {
    KNOWN_APPS
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, name)| *name)
}

/// Drop system components and order by label (case-insensitive), then id.
pub fn user_apps(apps: Vec<InstalledApp>) -> Vec<InstalledApp> {
    let mut user: Vec<InstalledApp> = apps.into_iter().filter(|app| !app.is_system).collect();
    user.sort_by(|a, b| {
        a.app_name
            .to_lowercase()
            .cmp(&b.app_name.to_lowercase())
            .then_with(|| a.package_name.cmp(&b.package_name))
    });
    user
}

/// Lists user-installed apps and remembers their labels.
pub struct AppCatalog {
    bridge: Arc<dyn PlatformBridge>,
    /// Labels from the most recent listing, keyed by package name.
    labels: RwLock<HashMap<String, String>>,
}

impl AppCatalog {
    pub fn new(bridge: Arc<dyn PlatformBridge>) -> Self {
        Self {
            bridge,
            labels: RwLock::new(HashMap::new()),
        }
    }

    /// Installed non-system apps.
    #[instrument(skip(self))]
    pub fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        let all = self.bridge.installed_apps()?;
        let total = all.len();
        let apps = user_apps(all);
        debug!(total, user = apps.len(), "installed apps filtered");

        if let Ok(mut labels) = self.labels.write() {
            labels.clear();
            labels.extend(
                apps.iter()
                    .map(|app| (app.package_name.clone(), app.app_name.clone())),
            );
        }
        Ok(apps)
    }

    /// Display name for `identifier`: installed label, then the built-in
    /// table, then the identifier itself.
    pub fn display_name(&self, identifier: &str) -> String {
        if let Some(label) = self
            .labels
            .read()
            .ok()
            .and_then(|labels| labels.get(identifier).cloned())
        {
            return label;
        }
        known_app_name(identifier).map_or_else(|| identifier.to_owned(), str::to_owned)
    }
}
