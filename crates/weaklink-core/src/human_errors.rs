// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the application layer.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives whether the UI shows a permission prompt, a passive
// notice, or nothing at all.

use crate::error::WeaklinkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing to report yet — try again later.
    Transient,
    /// User must do something (grant usage access).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the watcher should keep polling.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `WeaklinkError` into a `HumanError`.
pub fn humanize_error(err: &WeaklinkError) -> HumanError {
    match err {
        WeaklinkError::ProviderUnavailable(_) => HumanError {
            message: "We can't see which app you're using.".into(),
            suggestion: "Open Settings and allow Usage Access for WeakLink.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },
        WeaklinkError::ProviderEmpty => HumanError {
            message: "No recent app activity yet.".into(),
            suggestion: "Keep using your phone and check again in a moment.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        WeaklinkError::Bridge(_) | WeaklinkError::Watcher(_) => HumanError {
            message: "Something went wrong talking to your phone.".into(),
            suggestion: "Close WeakLink completely and open it again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        WeaklinkError::PlatformUnavailable => HumanError {
            message: "This phone doesn't share app usage with WeakLink.".into(),
            suggestion: "App tracking works on Android devices.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        WeaklinkError::Config(_) | WeaklinkError::Serialization(_) => HumanError {
            message: "Your WeakLink settings look damaged.".into(),
            suggestion: "Reset the settings to their defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        WeaklinkError::Io(_) => HumanError {
            message: "WeakLink couldn't save or read its settings.".into(),
            suggestion: "Check that your phone has free storage space.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_permission_asks_for_action() {
        let err = WeaklinkError::ProviderUnavailable("usage access not granted".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("Usage Access"));
    }

    #[test]
    fn empty_provider_is_transient() {
        let human = humanize_error(&WeaklinkError::ProviderEmpty);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn unsupported_platform_is_permanent() {
        let human = humanize_error(&WeaklinkError::PlatformUnavailable);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }
}
