//! Aggregation of listening events into the summary views
//!
//! Every grouped view follows the same shape: group by key, sum
//! `ms_played`, convert to rounded hours, then sort and truncate.

use chrono::Timelike;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::consts::{MONTH_FORMAT, MS_PER_HOUR};
use crate::core::types::{
    Behavior, HourlyHours, ListeningEvent, PlatformClass, PlatformCount, Ranked, Summary,
    TopLimits,
};
use crate::utils::Timezone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct AggregateOptions {
    pub(crate) limits: TopLimits,
    /// Zone used for hour-of-day buckets; month buckets are always UTC
    pub(crate) timezone: Timezone,
}

/// Milliseconds to hours, rounded to two decimals
pub(crate) fn ms_to_hours(ms: u64) -> f64 {
    (ms as f64 / MS_PER_HOUR * 100.0).round() / 100.0
}

/// Sums keyed totals while remembering the order keys were first seen.
#[derive(Debug)]
struct Grouped<K> {
    index: HashMap<K, usize>,
    totals: Vec<(K, u64)>,
}

impl<K: std::hash::Hash + Eq + Clone> Grouped<K> {
    fn new() -> Self {
        Grouped {
            index: HashMap::new(),
            totals: Vec::new(),
        }
    }

    fn add(&mut self, key: K, amount: u64) {
        match self.index.get(&key) {
            Some(&i) => self.totals[i].1 += amount,
            None => {
                self.index.insert(key.clone(), self.totals.len());
                self.totals.push((key, amount));
            }
        }
    }

    fn into_totals(self) -> Vec<(K, u64)> {
        self.totals
    }
}

fn compare_hours_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Rounded hours sorted descending (stable) and cut to `limit` (0 = all)
fn rank(grouped: Grouped<String>, limit: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = grouped
        .into_totals()
        .into_iter()
        .map(|(key, ms)| Ranked {
            key,
            hours: ms_to_hours(ms),
        })
        .collect();
    ranked.sort_by(|a, b| compare_hours_desc(a.hours, b.hours));
    if limit > 0 {
        ranked.truncate(limit);
    }
    ranked
}

fn non_empty(name: Option<&String>) -> Option<&String> {
    name.filter(|n| !n.is_empty())
}

pub(crate) fn platform_counts(events: &[ListeningEvent]) -> Vec<PlatformCount> {
    let mut grouped = Grouped::new();
    for event in events {
        grouped.add(PlatformClass::classify(&event.platform), 1);
    }
    let mut counts: Vec<PlatformCount> = grouped
        .into_totals()
        .into_iter()
        .map(|(platform, count)| PlatformCount { platform, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub(crate) fn country_hours(events: &[ListeningEvent], limit: usize) -> Vec<Ranked> {
    let mut grouped = Grouped::new();
    for event in events {
        grouped.add(event.country.clone(), event.ms_played);
    }
    rank(grouped, limit)
}

pub(crate) fn artist_hours(events: &[ListeningEvent], limit: usize) -> Vec<Ranked> {
    let mut grouped = Grouped::new();
    for event in events {
        if let Some(artist) = non_empty(event.artist_name.as_ref()) {
            grouped.add(artist.clone(), event.ms_played);
        }
    }
    rank(grouped, limit)
}

pub(crate) fn album_hours(events: &[ListeningEvent], limit: usize) -> Vec<Ranked> {
    let mut grouped = Grouped::new();
    for event in events {
        if let Some(album) = non_empty(event.album_name.as_ref()) {
            grouped.add(album.clone(), event.ms_played);
        }
    }
    rank(grouped, limit)
}

pub(crate) fn podcast_hours(events: &[ListeningEvent], limit: usize) -> Vec<Ranked> {
    let mut grouped = Grouped::new();
    for event in events {
        if let Some(show) = non_empty(event.episode_show_name.as_ref()) {
            grouped.add(show.clone(), event.ms_played);
        }
    }
    rank(grouped, limit)
}

/// Monthly totals keyed `YYYY-MM` (UTC), oldest first
pub(crate) fn monthly_hours(events: &[ListeningEvent]) -> Vec<Ranked> {
    let mut grouped = Grouped::new();
    for event in events {
        grouped.add(
            event.timestamp.format(MONTH_FORMAT).to_string(),
            event.ms_played,
        );
    }
    let mut months: Vec<Ranked> = grouped
        .into_totals()
        .into_iter()
        .map(|(key, ms)| Ranked {
            key,
            hours: ms_to_hours(ms),
        })
        .collect();
    months.sort_by(|a, b| a.key.cmp(&b.key));
    months
}

/// Hour-of-day totals in `timezone`; hours without events are omitted
pub(crate) fn hourly_hours(events: &[ListeningEvent], timezone: Timezone) -> Vec<HourlyHours> {
    let mut per_hour = [0u64; 24];
    let mut seen = [false; 24];
    for event in events {
        let hour = timezone.to_fixed_offset(event.timestamp).hour() as usize;
        per_hour[hour] += event.ms_played;
        seen[hour] = true;
    }
    (0..24)
        .filter(|&h| seen[h])
        .map(|h| HourlyHours {
            hour: h as u32,
            hours: ms_to_hours(per_hour[h]),
        })
        .collect()
}

pub(crate) fn behavior(events: &[ListeningEvent]) -> Behavior {
    let mut behavior = Behavior::default();
    for event in events {
        behavior.total += 1;
        behavior.skipped += u64::from(event.skipped);
        behavior.shuffled += u64::from(event.shuffle);
        behavior.offline += u64::from(event.offline);
    }
    behavior
}

/// Build every view from one event list. Pure and deterministic.
pub(crate) fn aggregate(events: &[ListeningEvent], opts: &AggregateOptions) -> Summary {
    Summary {
        platform_counts: platform_counts(events),
        country_hours: country_hours(events, opts.limits.countries),
        artist_hours: artist_hours(events, opts.limits.artists),
        album_hours: album_hours(events, opts.limits.albums),
        monthly_hours: monthly_hours(events),
        behavior: behavior(events),
        top_podcasts: podcast_hours(events, opts.limits.podcasts),
        hourly_hours: hourly_hours(events, opts.timezone),
    }
}
