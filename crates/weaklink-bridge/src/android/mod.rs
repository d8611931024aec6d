// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method is one call into an Android
// system service through the ART runtime:
//
// - usage records   → `UsageStatsManager.queryUsageStats(INTERVAL_DAILY, …)`
// - installed apps  → `PackageManager.getInstalledApplications(GET_META_DATA)`
// - usage settings  → `Intent(Settings.ACTION_USAGE_ACCESS_SETTINGS)`
//
// Android does not fail a usage query when the user has not granted usage
// access; it silently returns an empty list. Telling the two apart is the
// job of the permission probe in `weaklink-usage`.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JObject, JString, JValue};

use weaklink_core::error::{Result, WeaklinkError};
use weaklink_core::types::{InstalledApp, TimeWindow, UsageRecord};

use crate::traits::*;

// ---------------------------------------------------------------------------
// Android SDK constants
// ---------------------------------------------------------------------------

/// `Context.USAGE_STATS_SERVICE`.
const USAGE_STATS_SERVICE: &str = "usagestats";

/// `UsageStatsManager.INTERVAL_DAILY`.
const INTERVAL_DAILY: i32 = 0;

/// `PackageManager.GET_META_DATA`.
const GET_META_DATA: i32 = 0x0000_0080;

/// `ApplicationInfo.FLAG_SYSTEM`.
const FLAG_SYSTEM: i32 = 0x0000_0001;

/// `Settings.ACTION_USAGE_ACCESS_SETTINGS`.
const ACTION_USAGE_ACCESS_SETTINGS: &str = "android.settings.USAGE_ACCESS_SETTINGS";

/// `Intent.FLAG_ACTIVITY_NEW_TASK`; the NDK context may be the Application.
const FLAG_ACTIVITY_NEW_TASK: i32 = 0x1000_0000;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Run `f` with an attached [`JNIEnv`] and the hosting Android `Context`.
///
/// The `JavaVM*` and context `jobject` come from `ndk_context`, set by the
/// NDK glue (`android_main` / `ANativeActivity_onCreate`). A Java exception
/// left pending by a failed call is cleared before returning, so the next
/// JNI call on this thread starts clean.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| WeaklinkError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| WeaklinkError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(WeaklinkError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Context.
    let context = unsafe { JObject::from_raw(ptr.cast()) };

    let result = f(&mut *env, &context);

    if result.is_err() && env.exception_check().unwrap_or(false) {
        if let Err(e) = env.exception_clear() {
            tracing::warn!(error = %e, "Android: failed to clear pending Java exception");
        }
    }
    result
}

/// Convenience: map any `jni::errors::Error` into `WeaklinkError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> WeaklinkError {
    WeaklinkError::Bridge(format!("{context}: {e}"))
}

/// `obj.toString()` as a Rust `String`.
fn java_to_string(env: &mut JNIEnv<'_>, obj: &JObject<'_>) -> Result<String> {
    let j_str: JObject = env
        .call_method(obj, "toString", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("toString", e))?
        .l()
        .map_err(|e| jni_err("toString->l", e))?;
    let j_str = JString::from(j_str);
    let value: String = env
        .get_string(&j_str)
        .map_err(|e| jni_err("get_string", e))?
        .into();
    env.delete_local_ref(j_str)
        .map_err(|e| jni_err("delete_local_ref(string)", e))?;
    Ok(value)
}

/// `list.size()` for a `java.util.List`.
fn list_size(env: &mut JNIEnv<'_>, list: &JObject<'_>) -> Result<i32> {
    env.call_method(list, "size", "()I", &[])
        .map_err(|e| jni_err("List.size", e))?
        .i()
        .map_err(|e| jni_err("List.size->i", e))
}

/// `list.get(index)` for a `java.util.List`.
fn list_get<'a>(env: &mut JNIEnv<'a>, list: &JObject<'_>, index: i32) -> Result<JObject<'a>> {
    env.call_method(list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])
        .map_err(|e| jni_err("List.get", e))?
        .l()
        .map_err(|e| jni_err("List.get->l", e))
}

/// Obtain `UsageStatsManager` from the context.
///
/// A null manager means the service is absent or not bound on this device.
fn usage_stats_manager<'a>(env: &mut JNIEnv<'a>, context: &JObject<'_>) -> Result<JObject<'a>> {
    let j_name: JString = env
        .new_string(USAGE_STATS_SERVICE)
        .map_err(|e| jni_err("new_string(usagestats)", e))?;

    let manager: JObject = env
        .call_method(
            context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&j_name)],
        )
        .map_err(|e| jni_err("getSystemService(usagestats)", e))?
        .l()
        .map_err(|e| jni_err("getSystemService->l", e))?;

    if manager.is_null() {
        return Err(WeaklinkError::ProviderUnavailable(
            "UsageStatsManager not available".into(),
        ));
    }
    Ok(manager)
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the WeakLink platform bridge.
///
/// Zero-sized; all state lives on the Java side. The first JNI call happens
/// lazily when a trait method is invoked.
pub struct AndroidBridge;

impl AndroidBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// UsageStatsProvider — android.app.usage.UsageStatsManager
// ---------------------------------------------------------------------------

impl UsageStatsProvider for AndroidBridge {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>> {
        with_env(|env, context| {
            let manager = usage_stats_manager(env, context)?;

            let list: JObject = env
                .call_method(
                    &manager,
                    "queryUsageStats",
                    "(IJJ)Ljava/util/List;",
                    &[
                        JValue::Int(INTERVAL_DAILY),
                        JValue::Long(window.start_ms),
                        JValue::Long(window.end_ms),
                    ],
                )
                .map_err(|e| jni_err("queryUsageStats", e))?
                .l()
                .map_err(|e| jni_err("queryUsageStats->l", e))?;

            if list.is_null() {
                tracing::debug!("Android: queryUsageStats returned null");
                return Ok(Vec::new());
            }

            let size = list_size(env, &list)?;
            let mut records = Vec::with_capacity(usize::try_from(size).unwrap_or(0));

            for index in 0..size {
                let stats = list_get(env, &list, index)?;

                let j_pkg: JObject = env
                    .call_method(&stats, "getPackageName", "()Ljava/lang/String;", &[])
                    .map_err(|e| jni_err("getPackageName", e))?
                    .l()
                    .map_err(|e| jni_err("getPackageName->l", e))?;
                let package = java_to_string(env, &j_pkg)?;

                let last_used = env
                    .call_method(&stats, "getLastTimeUsed", "()J", &[])
                    .map_err(|e| jni_err("getLastTimeUsed", e))?
                    .j()
                    .map_err(|e| jni_err("getLastTimeUsed->j", e))?;

                env.delete_local_ref(j_pkg)
                    .map_err(|e| jni_err("delete_local_ref(package)", e))?;
                env.delete_local_ref(stats)
                    .map_err(|e| jni_err("delete_local_ref(stats)", e))?;

                records.push(UsageRecord::new(package, last_used));
            }

            tracing::debug!(
                start_ms = window.start_ms,
                end_ms = window.end_ms,
                count = records.len(),
                "Android: usage stats queried"
            );
            Ok(records)
        })
    }
}

// ---------------------------------------------------------------------------
// InstalledAppsProvider — android.content.pm.PackageManager
// ---------------------------------------------------------------------------

impl InstalledAppsProvider for AndroidBridge {
    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        with_env(|env, context| {
            let package_manager: JObject = env
                .call_method(
                    context,
                    "getPackageManager",
                    "()Landroid/content/pm/PackageManager;",
                    &[],
                )
                .map_err(|e| jni_err("getPackageManager", e))?
                .l()
                .map_err(|e| jni_err("getPackageManager->l", e))?;

            let list: JObject = env
                .call_method(
                    &package_manager,
                    "getInstalledApplications",
                    "(I)Ljava/util/List;",
                    &[JValue::Int(GET_META_DATA)],
                )
                .map_err(|e| jni_err("getInstalledApplications", e))?
                .l()
                .map_err(|e| jni_err("getInstalledApplications->l", e))?;

            if list.is_null() {
                return Ok(Vec::new());
            }

            let size = list_size(env, &list)?;
            let mut apps = Vec::with_capacity(usize::try_from(size).unwrap_or(0));

            for index in 0..size {
                let info = list_get(env, &list, index)?;

                let flags = env
                    .get_field(&info, "flags", "I")
                    .map_err(|e| jni_err("ApplicationInfo.flags", e))?
                    .i()
                    .map_err(|e| jni_err("flags->i", e))?;

                let j_pkg: JObject = env
                    .get_field(&info, "packageName", "Ljava/lang/String;")
                    .map_err(|e| jni_err("ApplicationInfo.packageName", e))?
                    .l()
                    .map_err(|e| jni_err("packageName->l", e))?;
                let package_name = java_to_string(env, &j_pkg)?;

                // packageManager.getApplicationLabel(info) returns a CharSequence.
                let label: JObject = env
                    .call_method(
                        &package_manager,
                        "getApplicationLabel",
                        "(Landroid/content/pm/ApplicationInfo;)Ljava/lang/CharSequence;",
                        &[JValue::Object(&info)],
                    )
                    .map_err(|e| jni_err("getApplicationLabel", e))?
                    .l()
                    .map_err(|e| jni_err("getApplicationLabel->l", e))?;
                let app_name = if label.is_null() {
                    package_name.clone()
                } else {
                    java_to_string(env, &label)?
                };

                env.delete_local_ref(label)
                    .map_err(|e| jni_err("delete_local_ref(label)", e))?;
                env.delete_local_ref(j_pkg)
                    .map_err(|e| jni_err("delete_local_ref(package)", e))?;
                env.delete_local_ref(info)
                    .map_err(|e| jni_err("delete_local_ref(info)", e))?;

                apps.push(InstalledApp {
                    package_name,
                    app_name,
                    is_system: flags & FLAG_SYSTEM != 0,
                });
            }

            tracing::info!(count = apps.len(), "Android: installed applications listed");
            Ok(apps)
        })
    }
}

// ---------------------------------------------------------------------------
// UsageAccessSettings — Settings.ACTION_USAGE_ACCESS_SETTINGS
// ---------------------------------------------------------------------------

impl UsageAccessSettings for AndroidBridge {
    fn open_usage_access_settings(&self) -> Result<()> {
        with_env(|env, context| {
            let j_action: JString = env
                .new_string(ACTION_USAGE_ACCESS_SETTINGS)
                .map_err(|e| jni_err("new_string(ACTION_USAGE_ACCESS_SETTINGS)", e))?;

            let intent: JObject = env
                .new_object(
                    "android/content/Intent",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&j_action)],
                )
                .map_err(|e| jni_err("new Intent(usage access)", e))?;

            env.call_method(
                &intent,
                "addFlags",
                "(I)Landroid/content/Intent;",
                &[JValue::Int(FLAG_ACTIVITY_NEW_TASK)],
            )
            .map_err(|e| jni_err("addFlags", e))?;

            env.call_method(
                context,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )
            .map_err(|e| jni_err("startActivity(usage access)", e))?;

            tracing::info!("Android: usage access settings opened");
            Ok(())
        })
    }
}
