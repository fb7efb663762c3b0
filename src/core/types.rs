//! Core data types for listening history
//!
//! The parser converts every export record into a `ListeningEvent`; the
//! aggregator reduces a slice of them into a single `Summary`.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::consts::{
    DEFAULT_TOP_ALBUMS, DEFAULT_TOP_ARTISTS, DEFAULT_TOP_COUNTRIES, DEFAULT_TOP_PODCASTS,
};

/// One logged play, skip or podcast episode
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListeningEvent {
    pub(crate) timestamp: DateTime<Utc>,
    /// Free-text device/OS identifier, e.g. "iOS 17.1 (iPhone15,2)"
    pub(crate) platform: String,
    pub(crate) ms_played: u64,
    /// Two-letter connection country code
    pub(crate) country: String,
    #[allow(dead_code)]
    pub(crate) track_name: Option<String>,
    pub(crate) artist_name: Option<String>,
    pub(crate) album_name: Option<String>,
    pub(crate) shuffle: bool,
    pub(crate) skipped: bool,
    pub(crate) offline: bool,
    #[allow(dead_code)]
    pub(crate) reason_start: Option<String>,
    #[allow(dead_code)]
    pub(crate) reason_end: Option<String>,
    #[allow(dead_code)]
    pub(crate) episode_name: Option<String>,
    pub(crate) episode_show_name: Option<String>,
}

impl ListeningEvent {
    /// Podcast episodes carry a show name instead of track metadata
    pub(crate) fn is_podcast(&self) -> bool {
        self.episode_show_name.is_some()
    }
}

/// Coarse device bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PlatformClass {
    Computer,
    Phone,
    Other,
}

const COMPUTER_MARKERS: [&str; 5] = ["macos", "darwin", "os x", "linux", "windows"];
const PHONE_MARKERS: [&str; 4] = ["ios", "iphone", "ipad", "android"];

impl PlatformClass {
    /// Classify a raw platform string by case-insensitive substring match.
    /// Computer markers are checked first.
    pub(crate) fn classify(platform: &str) -> Self {
        let lower = platform.to_lowercase();
        if COMPUTER_MARKERS.iter().any(|m| lower.contains(m)) {
            PlatformClass::Computer
        } else if PHONE_MARKERS.iter().any(|m| lower.contains(m)) {
            PlatformClass::Phone
        } else {
            PlatformClass::Other
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PlatformClass::Computer => "Computer",
            PlatformClass::Phone => "Phone",
            PlatformClass::Other => "Other",
        }
    }
}

impl fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlatformCount {
    pub(crate) platform: PlatformClass,
    pub(crate) count: u64,
}

/// A grouping key with its total listening time
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ranked {
    pub(crate) key: String,
    pub(crate) hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HourlyHours {
    /// Hour of day, 0-23
    pub(crate) hour: u32,
    pub(crate) hours: f64,
}

/// Raw behaviour counters; rates are derived at presentation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Behavior {
    pub(crate) skipped: u64,
    pub(crate) shuffled: u64,
    pub(crate) offline: u64,
    pub(crate) total: u64,
}

impl Behavior {
    /// Percentage of `count` over all events, `None` for an empty history
    pub(crate) fn rate(&self, count: u64) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(count as f64 / self.total as f64 * 100.0)
    }
}

/// Everything the views render, derived from one event list
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Summary {
    pub(crate) platform_counts: Vec<PlatformCount>,
    pub(crate) country_hours: Vec<Ranked>,
    pub(crate) artist_hours: Vec<Ranked>,
    pub(crate) album_hours: Vec<Ranked>,
    pub(crate) monthly_hours: Vec<Ranked>,
    pub(crate) behavior: Behavior,
    pub(crate) top_podcasts: Vec<Ranked>,
    pub(crate) hourly_hours: Vec<HourlyHours>,
}

impl Summary {
    pub(crate) fn is_empty(&self) -> bool {
        self.behavior.total == 0
    }
}

/// Truncation counts for the ranked views. Zero keeps every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TopLimits {
    pub(crate) countries: usize,
    pub(crate) artists: usize,
    pub(crate) albums: usize,
    pub(crate) podcasts: usize,
}

impl Default for TopLimits {
    fn default() -> Self {
        TopLimits {
            countries: DEFAULT_TOP_COUNTRIES,
            artists: DEFAULT_TOP_ARTISTS,
            albums: DEFAULT_TOP_ALBUMS,
            podcasts: DEFAULT_TOP_PODCASTS,
        }
    }
}

/// Date filter for queries
#[derive(Debug, Clone, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<chrono::NaiveDate>,
    pub(crate) until: Option<chrono::NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<chrono::NaiveDate>, until: Option<chrono::NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub(crate) fn contains(&self, date: chrono::NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}
