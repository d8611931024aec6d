// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for WeakLink.

use thiserror::Error;

/// Top-level error type for all WeakLink operations.
#[derive(Debug, Error)]
pub enum WeaklinkError {
    // -- Usage provider --
    /// The usage-stats service could not be queried (permission missing,
    /// service not bound, manager absent).
    #[error("usage provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered but reported no records for the window.
    #[error("usage provider returned no records")]
    ProviderEmpty,

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Background watcher --
    #[error("watcher task failed: {0}")]
    Watcher(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WeaklinkError>;
