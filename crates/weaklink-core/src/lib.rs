// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WeakLink — Core types, errors and the foreground resolver shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod resolver;
pub mod types;

pub use config::UsageConfig;
pub use error::WeaklinkError;
pub use resolver::resolve_foreground;
pub use types::*;
