// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Foreground-application resolution from a window of usage records.
//
// The app with the latest `last_used_ms` is the one in the foreground. When
// several records share that timestamp, the lexicographically smallest
// application id wins, so the answer never depends on the order the
// platform happened to return records in.

use std::cmp::Ordering;

use crate::types::{Resolution, UsageRecord};

/// Resolve the most recently foregrounded application.
///
/// Returns [`Resolution::Unknown`] for an empty slice. Pure and
/// order-insensitive: any permutation of `records` gives the same result.
pub fn resolve_foreground(records: &[UsageRecord]) -> Resolution {
    records
        .iter()
        .max_by(|a, b| compare_recency(a, b))
        .map_or(Resolution::Unknown, |record| {
            Resolution::Resolved(record.application_id.clone())
        })
}

/// Orders records so the winner is the maximum: later timestamp first, then
/// smaller application id.
fn compare_recency(a: &UsageRecord, b: &UsageRecord) -> Ordering {
    a.last_used_ms
        .cmp(&b.last_used_ms)
        .then_with(|| b.application_id.cmp(&a.application_id))
}
