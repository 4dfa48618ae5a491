// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Utc};

/// Format a timestamp as a short calendar date, e.g. "Jan 5, 2026".
pub fn format_added_on(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
