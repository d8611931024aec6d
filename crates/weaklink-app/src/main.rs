// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WeakLink host process.
//
// Entry point. Initialises logging and services, reports usage access and
// the installed apps, then runs the tracked-app watcher until Ctrl-C.

mod services;

use weaklink_core::human_errors::humanize_error;
use weaklink_usage::UsageAccess;

use services::app_services::AppServices;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("WeakLink starting");

    let svc = match AppServices::init() {
        Ok(s) => s,
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, suggestion = %human.suggestion, "{}", human.message);
            std::process::exit(1);
        }
    };

    match svc.ensure_usage_access() {
        UsageAccess::Granted => tracing::info!("usage access granted"),
        UsageAccess::NotGranted => {
            tracing::warn!("usage access not granted — settings screen requested")
        }
        UsageAccess::Unavailable(reason) => {
            tracing::warn!(%reason, platform = svc.platform_name(), "usage provider unavailable")
        }
    }

    match svc.installed_apps() {
        Ok(apps) => tracing::info!(count = apps.len(), "user apps installed"),
        Err(e) => tracing::warn!(error = %e, "installed apps unavailable"),
    }

    match svc.current_foreground() {
        Ok(resolution) => tracing::info!(app = %resolution, "current foreground app"),
        Err(e) => tracing::warn!(error = %e, "{}", humanize_error(&e).message),
    }

    let Some((handle, mut events)) = svc.start_watcher() else {
        tracing::info!("no tracked apps configured, exiting");
        return;
    };

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "failed to listen for Ctrl-C");
                }
                break;
            }

            event = events.recv() => {
                let Some(event) = event else { break };
                match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(event = %json, "detection"),
                    Err(e) => tracing::warn!(error = %e, "could not serialize detection event"),
                }
            }
        }
    }

    if let Err(e) = handle.stop().await {
        tracing::error!(error = %e, "watcher did not stop cleanly");
    }
    tracing::info!("WeakLink stopped");
}
