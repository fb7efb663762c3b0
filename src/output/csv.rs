use std::fmt::Write;

use crate::cli::{SortOrder, View};
use crate::core::{Ranked, Summary};

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn rate_field(rate: Option<f64>) -> String {
    rate.map(|r| format!("{r:.2}")).unwrap_or_default()
}

fn ranked_csv(out: &mut String, label: &str, ranked: &[Ranked]) {
    let _ = writeln!(out, "{label},hours");
    for r in ranked {
        let _ = writeln!(out, "{},{:.2}", csv_escape(&r.key), r.hours);
    }
}

fn write_view(out: &mut String, view: View, summary: &Summary, order: SortOrder) {
    match view {
        View::Summary => {
            for (i, tab) in View::TABS.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_view(out, *tab, summary, order);
            }
        }
        View::Timeline => {
            let _ = writeln!(out, "month,hours");
            let rows: Vec<&Ranked> = match order {
                SortOrder::Asc => summary.monthly_hours.iter().collect(),
                SortOrder::Desc => summary.monthly_hours.iter().rev().collect(),
            };
            for m in rows {
                let _ = writeln!(out, "{},{:.2}", m.key, m.hours);
            }
        }
        View::Platforms => {
            let _ = writeln!(out, "platform,count");
            for p in &summary.platform_counts {
                let _ = writeln!(out, "{},{}", p.platform, p.count);
            }
        }
        View::Countries => ranked_csv(out, "country", &summary.country_hours),
        View::Artists => ranked_csv(out, "artist", &summary.artist_hours),
        View::Albums => ranked_csv(out, "album", &summary.album_hours),
        View::Podcasts => ranked_csv(out, "show", &summary.top_podcasts),
        View::Behavior => {
            let b = &summary.behavior;
            let _ = writeln!(
                out,
                "skipped,shuffled,offline,total,skip_rate,shuffle_rate,offline_rate"
            );
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                b.skipped,
                b.shuffled,
                b.offline,
                b.total,
                rate_field(b.rate(b.skipped)),
                rate_field(b.rate(b.shuffled)),
                rate_field(b.rate(b.offline)),
            );
        }
        View::Hourly => {
            let _ = writeln!(out, "hour,hours");
            let rows: Vec<_> = match order {
                SortOrder::Asc => summary.hourly_hours.iter().collect(),
                SortOrder::Desc => summary.hourly_hours.iter().rev().collect(),
            };
            for h in rows {
                let _ = writeln!(out, "{},{:.2}", h.hour, h.hours);
            }
        }
    }
}

/// CSV for a view. `View::Summary` emits one section per tab, separated by a blank line.
pub(crate) fn render_view_csv(view: View, summary: &Summary, order: SortOrder) -> String {
    let mut out = String::new();
    write_view(&mut out, view, summary, order);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Behavior, HourlyHours};

    fn sample() -> Summary {
        Summary {
            artist_hours: vec![
                Ranked {
                    key: "Crosby, Stills & Nash".to_string(),
                    hours: 1.5,
                },
                Ranked {
                    key: "The \"Band\"".to_string(),
                    hours: 0.25,
                },
            ],
            hourly_hours: vec![
                HourlyHours {
                    hour: 8,
                    hours: 0.5,
                },
                HourlyHours {
                    hour: 21,
                    hours: 1.0,
                },
            ],
            behavior: Behavior {
                skipped: 1,
                shuffled: 1,
                offline: 0,
                total: 4,
            },
            ..Summary::default()
        }
    }

    #[test]
    fn csv_escape_quotes_special_fields() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn artists_are_escaped() {
        let out = render_view_csv(View::Artists, &sample(), SortOrder::Asc);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "artist,hours");
        assert_eq!(lines[1], "\"Crosby, Stills & Nash\",1.50");
        assert_eq!(lines[2], "\"The \"\"Band\"\"\",0.25");
    }

    #[test]
    fn hourly_desc_reverses_rows() {
        let out = render_view_csv(View::Hourly, &sample(), SortOrder::Desc);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["hour,hours", "21,1.00", "8,0.50"]);
    }

    #[test]
    fn behavior_row() {
        let out = render_view_csv(View::Behavior, &sample(), SortOrder::Asc);
        assert!(out.contains("1,1,0,4,25.00,25.00,0.00"));
    }

    #[test]
    fn empty_behavior_leaves_rates_blank() {
        let out = render_view_csv(View::Behavior, &Summary::default(), SortOrder::Asc);
        assert!(out.contains("0,0,0,0,,,"));
    }

    #[test]
    fn summary_has_a_section_per_tab() {
        let out = render_view_csv(View::Summary, &sample(), SortOrder::Asc);
        assert_eq!(out.split("\n\n").count(), View::TABS.len());
        assert!(out.starts_with("month,hours\n"));
    }
}
