use comfy_table::{Cell, Color, Table};
use std::fmt::Write;

use crate::cli::{SortOrder, View};
use crate::core::{Behavior, HourlyHours, PlatformClass, PlatformCount, Ranked, Summary};
use crate::output::format::{
    NumberFormat, bar, create_styled_table, format_hours, format_number, format_rate,
    header_cell, month_label, right_cell, styled_cell,
};
use crate::utils::Timezone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
    /// Zone the hourly view was bucketed in
    pub(crate) timezone: Timezone,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryOptions {
    pub(crate) events: usize,
    pub(crate) invalid: usize,
    pub(crate) elapsed_ms: Option<f64>,
}

/// Print the loaded-files header
pub(crate) fn print_file_list(files: &[String], use_color: bool) {
    if files.is_empty() {
        return;
    }
    println!();
    if use_color {
        println!("  \x1b[1mLoaded files\x1b[0m");
    } else {
        println!("  Loaded files");
    }
    for file in files {
        println!("    {file}");
    }
}

/// Print the summary line with optional timing
pub(crate) fn print_summary_line(
    summary: SummaryOptions,
    number_format: NumberFormat,
    use_color: bool,
) {
    let stats_text = format!(
        "{} listening events ({} invalid records skipped)",
        format_number(summary.events as u64, number_format),
        format_number(summary.invalid as u64, number_format)
    );

    if let Some(ms) = summary.elapsed_ms {
        if use_color {
            println!("\n  {} | \x1b[36m{:.0}ms\x1b[0m\n", stats_text, ms);
        } else {
            println!("\n  {} | {:.0}ms\n", stats_text, ms);
        }
    } else {
        println!("\n  {}\n", stats_text);
    }
}

fn ordered<T>(items: &[T], order: SortOrder) -> Vec<&T> {
    match order {
        SortOrder::Asc => items.iter().collect(),
        SortOrder::Desc => items.iter().rev().collect(),
    }
}

fn max_hours<'a>(hours: impl Iterator<Item = &'a f64>) -> f64 {
    hours.copied().fold(0.0, f64::max)
}

fn accent(opts: &TableOptions, color: Color) -> Option<Color> {
    if opts.use_color { Some(color) } else { None }
}

fn timeline_table(months: &[Ranked], opts: &TableOptions) -> Table {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Month", c),
        header_cell("", c),
        header_cell("Hours", c),
        header_cell("", c),
    ]);

    let max = max_hours(months.iter().map(|m| &m.hours));
    let bar_color = accent(opts, Color::Magenta);
    for month in ordered(months, opts.order) {
        table.add_row(vec![
            Cell::new(&month.key),
            Cell::new(month_label(&month.key)),
            right_cell(&format_hours(month.hours, nf), None, false),
            styled_cell(&bar(month.hours, max), bar_color, false),
        ]);
    }

    let total: f64 = months.iter().map(|m| m.hours).sum();
    let cyan = accent(opts, Color::Cyan);
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        Cell::new(""),
        right_cell(&format_hours(total, nf), cyan, true),
        Cell::new(""),
    ]);
    table
}

fn platform_table(counts: &[PlatformCount], total: u64, opts: &TableOptions) -> Table {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Platform", c),
        header_cell("Plays", c),
        header_cell("Share", c),
        header_cell("", c),
    ]);

    let max = counts.iter().map(|p| p.count).max().unwrap_or(0) as f64;
    for entry in counts {
        let color = match entry.platform {
            PlatformClass::Phone => accent(opts, Color::Blue),
            PlatformClass::Computer => accent(opts, Color::White),
            PlatformClass::Other => accent(opts, Color::DarkGrey),
        };
        let share = if total == 0 {
            None
        } else {
            Some(entry.count as f64 / total as f64 * 100.0)
        };
        table.add_row(vec![
            styled_cell(entry.platform.as_str(), color, false),
            right_cell(&format_number(entry.count, nf), None, false),
            right_cell(&format_rate(share, nf), None, false),
            styled_cell(&bar(entry.count as f64, max), color, false),
        ]);
    }
    table
}

fn ranked_table(label: &str, ranked: &[Ranked], opts: &TableOptions) -> Table {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", c),
        header_cell(label, c),
        header_cell("Hours", c),
        header_cell("", c),
    ]);

    let max = max_hours(ranked.iter().map(|r| &r.hours));
    let bar_color = accent(opts, Color::Green);
    for (i, entry) in ranked.iter().enumerate() {
        let name = if entry.key.is_empty() {
            "(unknown)"
        } else {
            entry.key.as_str()
        };
        table.add_row(vec![
            right_cell(&(i + 1).to_string(), None, false),
            Cell::new(name),
            right_cell(&format_hours(entry.hours, nf), None, false),
            styled_cell(&bar(entry.hours, max), bar_color, false),
        ]);
    }
    table
}

fn behavior_table(behavior: &Behavior, opts: &TableOptions) -> Table {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", c),
        header_cell("Plays", c),
        header_cell("Rate", c),
    ]);

    for (label, count) in [
        ("Skip Rate", behavior.skipped),
        ("Shuffle Usage", behavior.shuffled),
        ("Offline Listening", behavior.offline),
    ] {
        table.add_row(vec![
            Cell::new(label),
            right_cell(&format_number(count, nf), None, false),
            right_cell(&format_rate(behavior.rate(count), nf), None, false),
        ]);
    }

    let cyan = accent(opts, Color::Cyan);
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&format_number(behavior.total, nf), cyan, true),
        Cell::new(""),
    ]);
    table
}

fn hourly_table(hourly: &[HourlyHours], opts: &TableOptions) -> Table {
    let c = opts.use_color;
    let nf = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Hour", c),
        header_cell("Hours", c),
        header_cell("", c),
    ]);

    let max = max_hours(hourly.iter().map(|h| &h.hours));
    let bar_color = accent(opts, Color::Yellow);
    for entry in ordered(hourly, opts.order) {
        table.add_row(vec![
            Cell::new(format!("{:02}:00", entry.hour)),
            right_cell(&format_hours(entry.hours, nf), None, false),
            styled_cell(&bar(entry.hours, max), bar_color, false),
        ]);
    }
    table
}

fn view_title(view: View, opts: &TableOptions) -> String {
    match view {
        View::Hourly => format!("{} ({})", view.title(), opts.timezone.label()),
        _ => view.title().to_string(),
    }
}

/// Table for one view, or a short message when the view has no rows
fn render_single(view: View, summary: &Summary, opts: &TableOptions) -> String {
    let table = match view {
        View::Timeline if !summary.monthly_hours.is_empty() => {
            Some(timeline_table(&summary.monthly_hours, opts))
        }
        View::Platforms if !summary.platform_counts.is_empty() => Some(platform_table(
            &summary.platform_counts,
            summary.behavior.total,
            opts,
        )),
        View::Countries if !summary.country_hours.is_empty() => {
            Some(ranked_table("Country", &summary.country_hours, opts))
        }
        View::Artists if !summary.artist_hours.is_empty() => {
            Some(ranked_table("Artist", &summary.artist_hours, opts))
        }
        View::Albums if !summary.album_hours.is_empty() => {
            Some(ranked_table("Album", &summary.album_hours, opts))
        }
        View::Podcasts if !summary.top_podcasts.is_empty() => {
            Some(ranked_table("Show", &summary.top_podcasts, opts))
        }
        View::Hourly if !summary.hourly_hours.is_empty() => {
            Some(hourly_table(&summary.hourly_hours, opts))
        }
        View::Behavior => Some(behavior_table(&summary.behavior, opts)),
        _ => None,
    };

    let mut out = String::new();
    let _ = writeln!(out, "\n  {}\n", view_title(view, opts));
    match table {
        Some(table) => {
            let _ = writeln!(out, "{table}");
        }
        None => {
            let _ = writeln!(out, "  No {} data.", view.title().to_lowercase());
        }
    }
    out
}

/// Render a view as terminal tables. `View::Summary` renders every tab.
pub(crate) fn render_view_table(view: View, summary: &Summary, opts: &TableOptions) -> String {
    match view {
        View::Summary => View::TABS
            .iter()
            .map(|&tab| render_single(tab, summary, opts))
            .collect(),
        _ => render_single(view, summary, opts),
    }
}
