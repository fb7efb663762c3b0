use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli::{Cli, OutputFormat, SortOrder, View};
use crate::core::{AggregateOptions, DateFilter, ListeningEvent, aggregate};
use crate::error::AppError;
use crate::ingest::{Snapshot, UploadSession, discover_files, load_batch};
use crate::output::{
    NumberFormat, SummaryOptions, TableOptions, print_file_list, print_summary_line,
    render_view_csv, render_view_json, render_view_table,
};
use crate::utils::{Timezone, filter_json, parse_date};

/// Print JSON output, optionally filtering through jq
fn print_json(json: &str, jq_filter: Option<&str>) -> Result<(), AppError> {
    match jq_filter {
        Some(filter) => print!("{}", filter_json(json, filter)?),
        None => println!("{json}"),
    }
    Ok(())
}

fn date_filter(cli: &Cli) -> Result<DateFilter, AppError> {
    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;
    Ok(DateFilter::new(since, until))
}

/// Paths from the command line, or the configured export directory
fn input_paths(cli: &Cli) -> Vec<PathBuf> {
    let paths = &cli.command.input().paths;
    if paths.is_empty()
        && let Some(dir) = &cli.data_dir
    {
        tracing::debug!("No paths given, using data_dir {}", dir.display());
        return vec![dir.clone()];
    }
    paths.clone()
}

/// Zone whose calendar dates `--since/--until` compare against.
/// Month rows are UTC, so views showing them filter on UTC dates too.
fn filter_zone(view: View, timezone: Timezone) -> Timezone {
    match view {
        View::Timeline | View::Summary => Timezone::Named(chrono_tz::UTC),
        _ => timezone,
    }
}

fn apply_date_filter<'a>(
    events: &'a [ListeningEvent],
    filter: &DateFilter,
    timezone: Timezone,
) -> Cow<'a, [ListeningEvent]> {
    if filter.is_open() {
        return Cow::Borrowed(events);
    }
    let kept: Vec<ListeningEvent> = events
        .iter()
        .filter(|e| filter.contains(timezone.local_date(e.timestamp)))
        .cloned()
        .collect();
    tracing::debug!(
        "Date filter kept {} of {} events ({})",
        kept.len(),
        events.len(),
        timezone.label()
    );
    Cow::Owned(kept)
}

fn empty_message(invalid: usize) -> String {
    match invalid {
        0 => "No listening data found.".to_string(),
        1 => "No listening data found (1 invalid record skipped).".to_string(),
        n => format!("No listening data found ({n} invalid records skipped)."),
    }
}

fn report_notices(snapshot: &Snapshot, quiet: bool) {
    for notice in &snapshot.notices {
        tracing::debug!(file = %notice.file, "File skipped");
        if !quiet {
            eprintln!("Warning: {notice}");
        }
    }
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let start = Instant::now();
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
    let filter = date_filter(cli)?;
    let view = cli.command.view();

    if cli.order == SortOrder::Desc && view != View::Summary && !view.is_chronological() {
        tracing::debug!("--order only affects the timeline and hourly views");
    }
    if !timezone.is_utc() {
        tracing::debug!(
            "Months and month date filters use UTC, hours of day use {}",
            timezone.label()
        );
    }

    let files = discover_files(&input_paths(cli));
    let mut session = UploadSession::new();
    let ticket = session.begin(files)?;
    let uploaded = session.uploaded_files().to_vec();
    let outcomes = load_batch(&ticket);
    let generation = ticket.generation();
    let Some(snapshot) = session.complete(ticket, outcomes) else {
        tracing::debug!(generation, "Batch superseded before it completed");
        return Ok(());
    };
    tracing::debug!(
        generation = snapshot.generation,
        files = snapshot.files.len(),
        events = snapshot.events.len(),
        podcasts = snapshot.events.iter().filter(|e| e.is_podcast()).count(),
        invalid = snapshot.invalid_records,
        "Batch committed"
    );
    report_notices(snapshot, cli.quiet);

    let events = apply_date_filter(&snapshot.events, &filter, filter_zone(view, timezone));
    let invalid = snapshot.invalid_records;
    let summary = aggregate(
        &events,
        &AggregateOptions {
            limits: cli.top_limits(),
            timezone,
        },
    );
    let files = uploaded.as_slice();

    match cli.output_format() {
        OutputFormat::Json => {
            let json = render_view_json(view, &summary, files, cli.order);
            print_json(&json, cli.jq.as_deref())?;
        }
        OutputFormat::Csv => print!("{}", render_view_csv(view, &summary, cli.order)),
        OutputFormat::Table => {
            if summary.is_empty() {
                println!("{}", empty_message(invalid));
                return Ok(());
            }
            let use_color = cli.use_color();
            print_file_list(files, use_color);
            print!(
                "{}",
                render_view_table(
                    view,
                    &summary,
                    &TableOptions {
                        order: cli.order,
                        use_color,
                        number_format,
                        timezone,
                    },
                )
            );
            print_summary_line(
                SummaryOptions {
                    events: events.len(),
                    invalid,
                    elapsed_ms: (!cli.quiet).then(|| start.elapsed().as_secs_f64() * 1000.0),
                },
                number_format,
                use_color,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    fn event_at(ts: &str) -> ListeningEvent {
        ListeningEvent {
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
            platform: String::new(),
            ms_played: 3_600_000,
            country: String::new(),
            track_name: None,
            artist_name: None,
            album_name: None,
            shuffle: false,
            skipped: false,
            offline: false,
            reason_start: None,
            reason_end: None,
            episode_name: None,
            episode_show_name: None,
        }
    }

    fn tokyo() -> Timezone {
        Timezone::parse(Some("Asia/Tokyo")).unwrap()
    }

    #[test]
    fn month_views_filter_on_utc_dates() {
        assert!(filter_zone(View::Timeline, tokyo()).is_utc());
        assert!(filter_zone(View::Summary, tokyo()).is_utc());
        assert_eq!(filter_zone(View::Hourly, tokyo()), tokyo());
        assert_eq!(filter_zone(View::Artists, tokyo()), tokyo());
    }

    #[test]
    fn late_march_play_stays_in_march_for_timeline() {
        let events = vec![event_at("2024-03-31T20:00:00Z")];
        let april = DateFilter::new(NaiveDate::from_ymd_opt(2024, 4, 1), None);
        let march = DateFilter::new(None, NaiveDate::from_ymd_opt(2024, 3, 31));
        let zone = filter_zone(View::Timeline, tokyo());

        assert!(apply_date_filter(&events, &april, zone).is_empty());
        assert_eq!(apply_date_filter(&events, &march, zone).len(), 1);
        // the same play is already April 1st in Tokyo
        assert_eq!(apply_date_filter(&events, &april, tokyo()).len(), 1);
    }

    #[test]
    fn open_filter_borrows_events() {
        let events = vec![event_at("2024-03-31T20:00:00Z")];
        let kept = apply_date_filter(&events, &DateFilter::default(), tokyo());
        assert!(matches!(kept, Cow::Borrowed(_)));
    }

    #[test]
    fn empty_message_mentions_invalid_records() {
        assert_eq!(empty_message(0), "No listening data found.");
        assert_eq!(
            empty_message(1),
            "No listening data found (1 invalid record skipped)."
        );
        assert_eq!(
            empty_message(2),
            "No listening data found (2 invalid records skipped)."
        );
    }
}
