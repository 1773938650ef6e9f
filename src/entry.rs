use std::cmp::Reverse;
use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};

use crate::format::format_size;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// One member of a listed directory.
///
/// All display fields are derived from `size` and `mod_time` in [`Entry::new`],
/// so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub size: u64,
    pub size_str: String,
    /// Modification time in the server's local timezone
    pub time: String,
    pub time_utc: String,
    pub mod_time: SystemTime,
}

impl Entry {
    pub fn new(name: impl Into<String>, size: u64, mod_time: SystemTime) -> Self {
        let local: DateTime<Local> = mod_time.into();
        let utc: DateTime<Utc> = mod_time.into();

        Self {
            name: name.into(),
            size,
            size_str: format_size(size),
            time: local.format(TIME_FORMAT).to_string(),
            time_utc: utc.format(TIME_FORMAT).to_string(),
            mod_time,
        }
    }
}

/// Listing order, chosen by the request's query suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// A to Z
    #[default]
    ByName,
    /// Latest first
    ByTime,
    /// Biggest first
    BySize,
}

impl SortKey {
    /// Pick the order from the raw request target (path plus query).
    ///
    /// `?t` selects time, `?s` selects size; anything else sorts by name.
    pub fn from_request_target(target: &str) -> Self {
        if target.ends_with("?t") {
            SortKey::ByTime
        } else if target.ends_with("?s") {
            SortKey::BySize
        } else {
            SortKey::ByName
        }
    }

    /// Relative link that re-requests the current directory in this order.
    pub fn href(self) -> &'static str {
        match self {
            SortKey::ByName => ".",
            SortKey::ByTime => ".?t",
            SortKey::BySize => ".?s",
        }
    }
}

/// Stable in-place sort of `entries` by `key`.
pub fn sort_entries(entries: &mut [Entry], key: SortKey) {
    match key {
        SortKey::ByName => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::ByTime => entries.sort_by_key(|e| Reverse(e.mod_time)),
        SortKey::BySize => entries.sort_by_key(|e| Reverse(e.size)),
    }
}
